// Sensor tag catalogue

pub const DEFAULT_TREND_PARAMETER: &str = "310A_FI_4303";

pub const RADAR_PARAMETERS: [&str; 6] = [
    "310A_FI_4303",
    "310A_DI_3302",
    "310A_PI_0316",
    "310A_PI_0325",
    "310A_TI_5303_D",
    "310A_TI_5304_D",
];

pub const HEALTH_PARAMETERS: [&str; 5] = [
    "310A_FI_4303",
    "310A_DI_3302",
    "310A_PI_0316",
    "310A_TI_5303_D",
    "310A_TI_5304_D",
];

pub const TABLE_PARAMETERS: [&str; 5] = [
    "310A_FI_4303",
    "310A_DI_3302",
    "310A_PI_0316",
    "310A_TI_5303_D",
    "310A_TI_5304_D",
];

pub fn to_owned_list(tags: &[&str]) -> Vec<String> {
    tags.iter().map(|tag| tag.to_string()).collect()
}

/// Human readable name for a tag, falling back to the tag itself
pub fn display_name(tag: &str) -> &str {
    match tag {
        "310A_FI_4303" => "Flow Indicator 4303",
        "310A_DI_3302" => "Density Indicator 3302",
        "310A_PI_0316" => "Pressure Indicator 0316",
        "310A_PI_0325" => "Pressure Indicator 0325",
        "310A_TI_5303_D" => "Temperature Indicator 5303",
        "310A_TI_5304_D" => "Temperature Indicator 5304",
        "310A_FI_4301" => "Flow Indicator 4301",
        "310A_PDI_0308" => "Pressure Differential 0308",
        "310A_PI_0578" => "Pressure Indicator 0578",
        "310A_PI_0580" => "Pressure Indicator 0580",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("310A_PDI_0308"), "Pressure Differential 0308");
        assert_eq!(display_name("310ASP01SI01SPM"), "310ASP01SI01SPM");
    }
}
