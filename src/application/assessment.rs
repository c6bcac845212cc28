//! Assessment service: Orchestrates the scoring path.
//!
//! validate → derive features → score → categorize → recommend.
//! The path is stateless and deterministic apart from the timestamp.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{
    AssessmentInsights, AssessmentReport, FeatureDeriver, NoteScreen, PatientRecord,
    RecommendationEngine, RiskAssessment, RiskCategory, RiskFactors, ScoringInputs,
};
use crate::ports::RiskModel;

/// Service scoring single patient records.
pub struct AssessmentService<M>
where
    M: RiskModel,
{
    model: Arc<M>,
    deriver: FeatureDeriver,
    recommender: RecommendationEngine,
    note_screen: NoteScreen,
}

impl<M> AssessmentService<M>
where
    M: RiskModel,
{
    /// Create a new assessment service.
    pub fn new(model: Arc<M>) -> Self {
        Self {
            model,
            deriver: FeatureDeriver::new(),
            recommender: RecommendationEngine::new(),
            note_screen: NoteScreen::new(),
        }
    }

    /// Get a reference to the scoring backend.
    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Score one record.
    ///
    /// # Errors
    /// Returns `InsightError::Validation` if a required score is missing or a
    /// field is out of range. Nothing is scored in that case.
    pub fn assess(&self, record: &PatientRecord) -> crate::Result<RiskAssessment> {
        let inputs = self.prepare(record)?;
        Ok(self.finish(&inputs))
    }

    /// Score each record independently. A failing record does not affect the others.
    pub fn assess_batch(&self, records: &[PatientRecord]) -> Vec<crate::Result<RiskAssessment>> {
        let results: Vec<_> = records.iter().map(|r| self.assess(r)).collect();
        let failed = results.iter().filter(|r| r.is_err()).count();
        tracing::info!(
            "Batch assessment: {} records, {} rejected",
            results.len(),
            failed
        );
        results
    }

    /// Score one record and attach the factor breakdown and insights.
    ///
    /// # Errors
    /// Returns `InsightError::Validation` under the same conditions as [`Self::assess`].
    pub fn report(&self, record: &PatientRecord) -> crate::Result<AssessmentReport> {
        let inputs = self.prepare(record)?;
        let risk_assessment = self.finish(&inputs);

        let note_analysis = record
            .clinical_note
            .as_deref()
            .and_then(|note| self.note_screen.screen(note));
        if note_analysis.as_ref().is_some_and(|f| f.elevated_concern) {
            tracing::warn!("Clinical note screen flagged elevated concern");
        }

        Ok(AssessmentReport {
            patient_data: record.clone(),
            factors: RiskFactors::from_inputs(&inputs),
            insights: AssessmentInsights::new(inputs.phq9_score as i64, note_analysis),
            risk_assessment,
        })
    }

    fn prepare(&self, record: &PatientRecord) -> crate::Result<ScoringInputs> {
        if let Err(e) = record.validate_for_scoring() {
            tracing::debug!("Rejected record: {}", e);
            return Err(e);
        }
        let features = self.deriver.derive(record);
        Ok(ScoringInputs::from(&features))
    }

    fn finish(&self, inputs: &ScoringInputs) -> RiskAssessment {
        let risk_score = self.model.score(inputs);
        let risk_category = RiskCategory::from_score(risk_score);
        tracing::debug!("Scored record: {:.4} ({})", risk_score, risk_category);

        RiskAssessment {
            risk_score,
            risk_category,
            confidence: self.model.confidence(),
            recommendations: self.recommender.recommend(risk_category),
            timestamp: Utc::now(),
            model_version: self.model.model_version().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::composite::CompositeRiskModel;
    use crate::InsightError;

    fn service() -> AssessmentService<CompositeRiskModel> {
        AssessmentService::new(Arc::new(CompositeRiskModel::new()))
    }

    #[test]
    fn test_low_risk_patient() {
        let record = PatientRecord {
            age: Some(30),
            employment: Some("Employed".to_string()),
            education: Some("College".to_string()),
            ..PatientRecord::with_scores(4, 3)
        };
        let assessment = service().assess(&record).expect("Should assess");

        assert!((assessment.risk_score - 0.1322).abs() < 1e-3);
        assert_eq!(assessment.risk_category, RiskCategory::Low);
        assert_eq!(assessment.confidence, 0.85);
        assert_eq!(assessment.model_version, "1.0");
        assert_eq!(assessment.recommendations.len(), 5);
    }

    #[test]
    fn test_high_risk_patient() {
        let record = PatientRecord {
            age: Some(50),
            employment: Some("Disabled".to_string()),
            education: Some("Other".to_string()),
            ..PatientRecord::with_scores(22, 18)
        };
        let assessment = service().assess(&record).expect("Should assess");

        assert!((assessment.risk_score - 0.793).abs() < 1e-3);
        assert_eq!(assessment.risk_category, RiskCategory::High);
    }

    #[test]
    fn test_missing_phq9_is_rejected() {
        let record = PatientRecord {
            gad7_score: Some(5),
            ..Default::default()
        };
        match service().assess(&record) {
            Err(InsightError::Validation(msg)) => assert!(msg.contains("phq9_score")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_score_is_rejected_not_clamped() {
        let record = PatientRecord::with_scores(30, 5);
        assert!(matches!(
            service().assess(&record),
            Err(InsightError::Validation(_))
        ));
    }

    #[test]
    fn test_batch_is_independent() {
        let records = vec![
            PatientRecord::with_scores(4, 3),
            PatientRecord::default(),
            PatientRecord::with_scores(20, 15),
        ];
        let results = service().assess_batch(&records);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
    }

    #[test]
    fn test_report_includes_factors_and_note_screen() {
        let record = PatientRecord {
            age: Some(40),
            clinical_note: Some("Patient reports feeling hopeless".to_string()),
            ..PatientRecord::with_scores(14, 9)
        };
        let report = service().report(&record).expect("Should build report");

        assert!((report.factors.phq9 - 14.0 / 27.0).abs() < 1e-12);
        assert_eq!(report.insights.primary_driver, "PHQ-9 scores");
        let finding = report.insights.note_analysis.expect("Should screen note");
        assert!(finding.elevated_concern);
        assert_eq!(report.patient_data, record);
    }
}
