//! Loads the trained model, prices one car and prints the result.
//!
//! With no arguments the reference car (2014, 5.59 lakhs, 27000 km, petrol,
//! dealer, manual, first owner) is used. Otherwise pass the seven values in
//! model order: year present_price kms_driven fuel seller transmission owners.

use anyhow::{bail, Context, Result};
use car_price_predictor::config::{AppConfig, CONFIG_FILE};
use car_price_predictor::estimator::predict_price;
use car_price_predictor::features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use car_price_predictor::format::format_rupees;
use car_price_predictor::{init_tracing, loader};
use std::path::Path;

fn parse_features(args: &[String]) -> Result<FeatureVector> {
    if args.is_empty() {
        return Ok(FeatureVector::sample());
    }
    if args.len() != FEATURE_COUNT {
        bail!("expected {} values ({}), got {}", FEATURE_COUNT, FEATURE_NAMES.join(" "), args.len());
    }

    let mut values = [0.0f64; FEATURE_COUNT];
    for (i, raw) in args.iter().enumerate() {
        values[i] = raw
            .trim()
            .parse()
            .with_context(|| format!("{} is not a number: {:?}", FEATURE_NAMES[i], raw))?;
    }
    FeatureVector::from_values(values).context("values out of range or unknown category code")
}

fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let features = parse_features(&args)?;

    let cfg = AppConfig::load(Path::new(CONFIG_FILE));
    let loaded = loader::load_model(&cfg.model_path)
        .with_context(|| format!("loading model from {}", cfg.model_path.display()))?;
    tracing::info!(kind = loaded.kind, "model ready");

    let prediction = predict_price(loaded.handle.as_ref(), &features).context("prediction failed")?;
    println!("Selling price is {}", format_rupees(prediction.price_currency));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_args_uses_sample() {
        assert_eq!(parse_features(&[]).unwrap(), FeatureVector::sample());
    }

    #[test]
    fn parses_seven_values() {
        let args: Vec<String> = ["2017", "9.5", "43000", "1", "1", "1", "1"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let fv = parse_features(&args).unwrap();
        assert_eq!(fv.to_row(), [2017.0, 9.5, 43000.0, 1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn rejects_wrong_count_and_bad_codes() {
        let short: Vec<String> = vec!["2014".into(), "5.59".into()];
        assert!(parse_features(&short).is_err());

        let bad: Vec<String> = ["2014", "5.59", "27000", "9", "0", "0", "0"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(parse_features(&bad).is_err());
    }
}
