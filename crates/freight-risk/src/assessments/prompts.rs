use crate::integrations::WeatherSnapshot;

fn weather_json(weather: &WeatherSnapshot) -> String {
    serde_json::to_string(weather).unwrap_or_else(|_| weather.description.clone())
}

pub(crate) fn sea_outlook(weather: &WeatherSnapshot) -> String {
    format!(
        "Analyze this weather report for a sea shipment and return ONLY a JSON object with:\n\
         - assessment: 4-5 crisp, specific points (array of strings)\n\
         - riskScore: a number from -10 (very risky) to 10 (very safe)\n\
         - recommendation: \"Send the package\" or \"Do not send the package\"\n\n\
         Weather: {}",
        weather_json(weather)
    )
}

pub(crate) fn market_outlook(location: &str, weather: &WeatherSnapshot) -> String {
    format!(
        "Assess the current freight and logistics outlook around '{location}' (labour \
         actions, port congestion, fuel prices, regional disruption). Return ONLY a JSON \
         object with:\n\
         - outlookScore: a number from -10 (severe disruption) to 10 (very favourable)\n\
         - summary: one or two sentences\n\n\
         Current weather: {}",
        weather_json(weather)
    )
}

pub(crate) fn insurance(location: &str) -> String {
    format!(
        "For shipments starting at '{location}', return ONLY a JSON array of 3 insurance \
         recommendations. Each element is an object with:\n\
         - insuranceType: the type of insurance that minimizes risk\n\
         - risksCovered: array of strings\n\
         - uniqueness: what sets it apart\n\
         - facilities: array of strings\n\
         - whyAsset: why it is an asset\n\
         - description: a brief, precise description\n\
         Every recommendation must be specific, not vague."
    )
}
