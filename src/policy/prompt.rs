use crate::domain::RegionKey;

/// Figures the policy text is generated from.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyContext {
    pub region: RegionKey,
    pub predicted_demand: f64,
    pub actual_demand: f64,
    pub supply: f64,
    pub utilization: f64,
    pub residual: f64,
    pub inefficiency_score: f64,
    pub anomaly: bool,
}

pub fn build_prompt(ctx: &PolicyContext) -> String {
    format!(
        "You are a national energy grid optimization expert.\n\
         \n\
         Region: {region}\n\
         Predicted Demand: {predicted:.2}\n\
         Actual Demand: {actual:.2}\n\
         Supply: {supply:.2}\n\
         Utilization: {utilization:.3}\n\
         Residual: {residual:.2}\n\
         Inefficiency Score: {score:.4}\n\
         Anomaly Detected: {anomaly}\n\
         \n\
         Respond in 4 professional sentences:\n\
         1. Classify grid health\n\
         2. Explain structural inefficiency\n\
         3. Recommend immediate intervention\n\
         4. Suggest long-term infrastructure strategy\n",
        region = ctx.region,
        predicted = ctx.predicted_demand,
        actual = ctx.actual_demand,
        supply = ctx.supply,
        utilization = ctx.utilization,
        residual = ctx.residual,
        score = ctx.inefficiency_score,
        anomaly = if ctx.anomaly { "Yes" } else { "No" },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_formatting() {
        let prompt = build_prompt(&PolicyContext {
            region: RegionKey::NorthEastern,
            predicted_demand: 101.2345,
            actual_demand: 99.0,
            supply: 120.5,
            utilization: 0.84012,
            residual: -2.2345,
            inefficiency_score: 0.123456,
            anomaly: true,
        });

        assert!(prompt.starts_with("You are a national energy grid optimization expert."));
        assert!(prompt.contains("Region: North-Eastern\n"));
        assert!(prompt.contains("Predicted Demand: 101.23\n"));
        assert!(prompt.contains("Actual Demand: 99.00\n"));
        assert!(prompt.contains("Supply: 120.50\n"));
        assert!(prompt.contains("Utilization: 0.840\n"));
        assert!(prompt.contains("Residual: -2.23\n"));
        assert!(prompt.contains("Inefficiency Score: 0.1235\n"));
        assert!(prompt.contains("Anomaly Detected: Yes\n"));
        assert!(prompt.contains("4. Suggest long-term infrastructure strategy"));
    }
}
