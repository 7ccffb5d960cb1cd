use serde::Serialize;
use thiserror::Error;

use crate::depreciation::DepreciationProjection;
use crate::features::FeatureVector;
use crate::model::{ModelError, Regressor};

/// Currency units in one lakh.
pub const LAKH: f64 = 100_000.0;

/// Below this share of the showroom price the car is worth selling quickly.
pub const SELL_SOON_RATIO: f64 = 0.7;

/// Illustrative markup for the "market" figure.
pub const MARKET_MARKUP: f64 = 1.05;

#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("no model is loaded")]
    NoModel,

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("model returned no prediction")]
    EmptyOutput,

    #[error("model returned a non-finite prediction ({0})")]
    NonFinite(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub struct PredictionResult {
    pub price_lakhs: f64,
    pub price_currency: f64,
}

impl PredictionResult {
    pub fn from_lakhs(price_lakhs: f64) -> Self {
        PredictionResult { price_lakhs, price_currency: price_lakhs * LAKH }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Advisory {
    SellSoon,
    GoodResaleValue,
}

impl Advisory {
    /// Strictly below 70% of the showroom price means sell soon; equality
    /// counts as good value.
    pub fn for_prices(price_lakhs: f64, present_price: f64) -> Self {
        if price_lakhs < present_price * SELL_SOON_RATIO {
            Advisory::SellSoon
        } else {
            Advisory::GoodResaleValue
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Advisory::SellSoon => "Value is dropping fast. Consider selling soon.",
            Advisory::GoodResaleValue => "Your car holds a good resale value.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    pub prediction: PredictionResult,
    pub market: PredictionResult,
    pub projection: DepreciationProjection,
    pub advisory: Advisory,
}

impl Estimate {
    pub fn derive(features: &FeatureVector, prediction: PredictionResult) -> Self {
        Estimate {
            market: PredictionResult::from_lakhs(prediction.price_lakhs * MARKET_MARKUP),
            projection: DepreciationProjection::project(features.year, prediction.price_lakhs),
            advisory: Advisory::for_prices(prediction.price_lakhs, features.present_price),
            prediction,
        }
    }

    pub fn zero(features: &FeatureVector) -> Self {
        Self::derive(features, PredictionResult::default())
    }
}

/// What the interactive surface gets back from one submission.
#[derive(Debug, Clone, PartialEq)]
pub enum EstimateOutcome {
    Ready(Estimate),
    Failed { cause: String, fallback: Estimate },
}

impl EstimateOutcome {
    pub fn estimate(&self) -> &Estimate {
        match self {
            EstimateOutcome::Ready(e) => e,
            EstimateOutcome::Failed { fallback, .. } => fallback,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            EstimateOutcome::Ready(_) => None,
            EstimateOutcome::Failed { cause, .. } => Some(cause),
        }
    }
}

pub fn predict_price(
    model: &dyn Regressor,
    features: &FeatureVector,
) -> Result<PredictionResult, PredictionError> {
    let out = model.predict(&[features.to_row()])?;
    let lakhs = match out.as_slice() {
        [] => return Err(PredictionError::EmptyOutput),
        [first] => *first,
        more => {
            return Err(ModelError::OutputShape { expected: 1, got: more.len() }.into());
        }
    };
    if !lakhs.is_finite() {
        return Err(PredictionError::NonFinite(lakhs));
    }
    Ok(PredictionResult::from_lakhs(lakhs as f64))
}

/// Fail-soft estimate: any scoring failure becomes a zeroed result plus the
/// cause, so the form keeps working.
pub fn estimate(model: Option<&dyn Regressor>, features: &FeatureVector) -> EstimateOutcome {
    let result = match model {
        Some(m) => predict_price(m, features),
        None => Err(PredictionError::NoModel),
    };

    match result {
        Ok(prediction) => EstimateOutcome::Ready(Estimate::derive(features, prediction)),
        Err(e) => {
            tracing::warn!(error = %e, "prediction failed");
            EstimateOutcome::Failed { cause: e.to_string(), fallback: Estimate::zero(features) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Row;

    struct Fixed(Vec<f32>);

    impl Regressor for Fixed {
        fn predict(&self, _rows: &[Row]) -> Result<Vec<f32>, ModelError> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct Broken;

    impl Regressor for Broken {
        fn predict(&self, _rows: &[Row]) -> Result<Vec<f32>, ModelError> {
            Err(ModelError::Invalid("corrupt".into()))
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    #[test]
    fn currency_is_lakhs_times_100k() {
        for lakhs in [0.0, 0.35, 3.5, 7.25, 33.0] {
            let p = PredictionResult::from_lakhs(lakhs);
            assert_eq!(p.price_currency, lakhs * 100_000.0);
        }
    }

    #[test]
    fn sample_scenario() {
        let fv = FeatureVector::sample();
        let outcome = estimate(Some(&Fixed(vec![3.5])), &fv);
        assert!(outcome.failure().is_none());

        let e = outcome.estimate();
        assert_eq!(e.prediction.price_lakhs, 3.5);
        assert_eq!(e.prediction.price_currency, 350_000.0);
        assert_eq!(e.projection.points[0].price_lakhs, 3.5);
        assert!((e.projection.points[5].price_lakhs - 1.553).abs() < 1e-3);
        assert_eq!(e.advisory, Advisory::SellSoon);
        assert!((e.market.price_lakhs - 3.675).abs() < 1e-9);
    }

    #[test]
    fn advisory_threshold_is_strict() {
        let present = 5.0;
        let threshold = present * SELL_SOON_RATIO;
        assert_eq!(Advisory::for_prices(threshold, present), Advisory::GoodResaleValue);
        assert_eq!(Advisory::for_prices(threshold - 1e-9, present), Advisory::SellSoon);
        assert_eq!(Advisory::for_prices(present, present), Advisory::GoodResaleValue);
    }

    #[test]
    fn model_error_degrades_to_zero() {
        let fv = FeatureVector::sample();
        let outcome = estimate(Some(&Broken), &fv);
        assert!(outcome.failure().unwrap().contains("corrupt"));
        let e = outcome.estimate();
        assert_eq!(e.prediction, PredictionResult::default());
        assert_eq!(e.projection.points.len(), 6);
        assert!(e.projection.points.iter().all(|p| p.price_lakhs == 0.0));
    }

    #[test]
    fn missing_model_degrades_to_zero() {
        let outcome = estimate(None, &FeatureVector::sample());
        assert_eq!(outcome.failure(), Some("no model is loaded"));
        assert_eq!(outcome.estimate().prediction.price_currency, 0.0);
    }

    #[test]
    fn strict_prediction_reports_bad_outputs() {
        let fv = FeatureVector::sample();
        assert!(matches!(
            predict_price(&Fixed(vec![]), &fv),
            Err(PredictionError::EmptyOutput)
        ));
        assert!(matches!(
            predict_price(&Fixed(vec![f32::NAN]), &fv),
            Err(PredictionError::NonFinite(_))
        ));
        assert!(matches!(
            predict_price(&Fixed(vec![1.0, 2.0]), &fv),
            Err(PredictionError::Model(ModelError::OutputShape { expected: 1, got: 2 }))
        ));
    }
}
