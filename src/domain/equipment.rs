// Reliability KPIs and per-equipment fault risk
use super::error::{AnalyticsError, AnalyticsResult};
use serde::{Deserialize, Serialize};

const KPI_GOOD_THRESHOLD: f64 = 95.0;
const KPI_WARNING_THRESHOLD: f64 = 85.0;

/// Traffic-light band shared by KPI cards and equipment health bars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Good,
    Warning,
    Alert,
}

impl Band {
    fn from_thresholds(value: f64, good: f64, warning: f64) -> Self {
        if value >= good {
            Band::Good
        } else if value >= warning {
            Band::Warning
        } else {
            Band::Alert
        }
    }
}

/// KPI fields arrive either as JSON numbers or as numeric strings
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    fn to_f64(&self, field: &str) -> AnalyticsResult<f64> {
        match self {
            NumberOrText::Number(value) => Ok(*value),
            NumberOrText::Text(text) => text.trim().parse().map_err(|_| {
                AnalyticsError::MalformedPayload(format!("{} is not numeric: {:?}", field, text))
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct KpiPayload {
    #[serde(rename = "MTBF")]
    mtbf: NumberOrText,
    #[serde(rename = "MTTR")]
    mttr: NumberOrText,
    #[serde(rename = "Availability")]
    availability: NumberOrText,
    #[serde(rename = "Reliability")]
    reliability: NumberOrText,
    #[serde(rename = "Total_Faults")]
    total_faults: NumberOrText,
    #[serde(rename = "Operating_Hours")]
    operating_hours: NumberOrText,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KpiReport {
    pub mtbf: f64,
    pub mttr: f64,
    pub availability: f64,
    pub reliability: f64,
    pub total_faults: f64,
    pub operating_hours: f64,
}

impl KpiReport {
    pub fn availability_band(&self) -> Band {
        Band::from_thresholds(self.availability, KPI_GOOD_THRESHOLD, KPI_WARNING_THRESHOLD)
    }

    pub fn reliability_band(&self) -> Band {
        Band::from_thresholds(self.reliability, KPI_GOOD_THRESHOLD, KPI_WARNING_THRESHOLD)
    }
}

impl TryFrom<KpiPayload> for KpiReport {
    type Error = AnalyticsError;

    fn try_from(payload: KpiPayload) -> AnalyticsResult<Self> {
        Ok(Self {
            mtbf: payload.mtbf.to_f64("MTBF")?,
            mttr: payload.mttr.to_f64("MTTR")?,
            availability: payload.availability.to_f64("Availability")?,
            reliability: payload.reliability.to_f64("Reliability")?,
            total_faults: payload.total_faults.to_f64("Total_Faults")?,
            operating_hours: payload.operating_hours.to_f64("Operating_Hours")?,
        })
    }
}

/// KPI values with their display bands
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    #[serde(flatten)]
    pub report: KpiReport,
    pub availability_band: Band,
    pub reliability_band: Band,
}

impl From<KpiReport> for KpiSummary {
    fn from(report: KpiReport) -> Self {
        Self {
            availability_band: report.availability_band(),
            reliability_band: report.reliability_band(),
            report,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Equipment {
    #[serde(rename = "sp")]
    Sp,
    #[serde(rename = "tk")]
    Tk,
    #[serde(rename = "vp")]
    Vp,
}

impl Equipment {
    pub const ALL: [Equipment; 3] = [Equipment::Sp, Equipment::Tk, Equipment::Vp];

    pub fn parse(code: &str) -> Option<Self> {
        match code.to_ascii_lowercase().as_str() {
            "sp" => Some(Equipment::Sp),
            "tk" => Some(Equipment::Tk),
            "vp" => Some(Equipment::Vp),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Equipment::Sp => "sp",
            Equipment::Tk => "tk",
            Equipment::Vp => "vp",
        }
    }

    /// Snapshot column carrying this equipment's fault flag
    pub fn fault_column(&self) -> &'static str {
        match self {
            Equipment::Sp => "faulty_SP",
            Equipment::Tk => "faulty_TK",
            Equipment::Vp => "faulty_VP",
        }
    }
}

/// Fault probabilities from the breakdown model; missing fields count as 0
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct FaultRisk {
    #[serde(rename = "faulty_SP", default)]
    pub faulty_sp: f64,
    #[serde(rename = "faulty_TK", default)]
    pub faulty_tk: f64,
    #[serde(rename = "faulty_VP", default)]
    pub faulty_vp: f64,
}

impl FaultRisk {
    pub fn probability(&self, equipment: Equipment) -> f64 {
        match equipment {
            Equipment::Sp => self.faulty_sp,
            Equipment::Tk => self.faulty_tk,
            Equipment::Vp => self.faulty_vp,
        }
    }

    pub fn validate(self) -> AnalyticsResult<Self> {
        for equipment in Equipment::ALL {
            let p = self.probability(equipment);
            if !(0.0..=1.0).contains(&p) {
                return Err(AnalyticsError::MalformedPayload(format!(
                    "{} probability {} outside [0, 1]",
                    equipment.fault_column(),
                    p
                )));
            }
        }
        Ok(self)
    }

    pub fn assess(&self) -> Vec<EquipmentRisk> {
        Equipment::ALL
            .iter()
            .map(|equipment| EquipmentRisk::from_probability(*equipment, self.probability(*equipment)))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskClass {
    Low,
    Medium,
    High,
}

impl RiskClass {
    pub fn from_percent(risk_percent: f64) -> Self {
        if risk_percent <= 25.0 {
            RiskClass::Low
        } else if risk_percent <= 50.0 {
            RiskClass::Medium
        } else {
            RiskClass::High
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EquipmentRisk {
    pub equipment: Equipment,
    pub health_percent: f64,
    pub risk_percent: f64,
    pub health_band: Band,
    pub risk_class: RiskClass,
}

impl EquipmentRisk {
    pub fn from_probability(equipment: Equipment, probability: f64) -> Self {
        let health_percent = ((1.0 - probability) * 100.0).max(0.0);
        let risk_percent = probability * 100.0;

        Self {
            equipment,
            health_percent,
            risk_percent,
            health_band: Band::from_thresholds(health_percent, 80.0, 60.0),
            risk_class: RiskClass::from_percent(risk_percent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kpi_payload_accepts_numeric_strings() {
        let json = r#"{
            "MTBF": 125.5, "MTTR": "0.25", "Availability": "99.8",
            "Reliability": 84.2, "Total_Faults": 4, "Operating_Hours": 502
        }"#;
        let payload: KpiPayload = serde_json::from_str(json).unwrap();
        let report = KpiReport::try_from(payload).unwrap();

        assert_eq!(report.mttr, 0.25);
        assert_eq!(report.availability, 99.8);
        assert_eq!(report.total_faults, 4.0);
        assert_eq!(report.availability_band(), Band::Good);
        assert_eq!(report.reliability_band(), Band::Alert);
    }

    #[test]
    fn test_kpi_payload_rejects_garbage() {
        let json = r#"{
            "MTBF": "n/a", "MTTR": 0.25, "Availability": 90,
            "Reliability": 90, "Total_Faults": 0, "Operating_Hours": 2
        }"#;
        let payload: KpiPayload = serde_json::from_str(json).unwrap();
        assert!(matches!(
            KpiReport::try_from(payload),
            Err(AnalyticsError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_kpi_summary_bands() {
        let report = KpiReport {
            mtbf: 1.0,
            mttr: 0.25,
            availability: 85.0,
            reliability: 95.0,
            total_faults: 0.0,
            operating_hours: 2.0,
        };
        let summary = KpiSummary::from(report);
        assert_eq!(summary.availability_band, Band::Warning);
        assert_eq!(summary.reliability_band, Band::Good);
    }

    #[test]
    fn test_fault_risk_assessment() {
        let risk: FaultRisk = serde_json::from_str(r#"{"faulty_SP": 0.1, "faulty_VP": 0.7}"#).unwrap();
        let assessed = risk.validate().unwrap().assess();

        assert_eq!(assessed.len(), 3);
        assert_eq!(assessed[0].equipment, Equipment::Sp);
        assert!((assessed[0].health_percent - 90.0).abs() < 1e-9);
        assert_eq!(assessed[0].health_band, Band::Good);
        assert_eq!(assessed[0].risk_class, RiskClass::Low);

        assert_eq!(assessed[1].equipment, Equipment::Tk);
        assert_eq!(assessed[1].health_percent, 100.0);

        assert_eq!(assessed[2].health_band, Band::Alert);
        assert_eq!(assessed[2].risk_class, RiskClass::High);
    }

    #[test]
    fn test_fault_risk_out_of_range() {
        let risk = FaultRisk {
            faulty_sp: 1.5,
            ..FaultRisk::default()
        };
        assert!(risk.validate().is_err());
    }

    #[test]
    fn test_risk_class_boundaries() {
        assert_eq!(RiskClass::from_percent(25.0), RiskClass::Low);
        assert_eq!(RiskClass::from_percent(50.0), RiskClass::Medium);
        assert_eq!(RiskClass::from_percent(50.1), RiskClass::High);
    }

    #[test]
    fn test_equipment_codes() {
        assert_eq!(Equipment::parse("TK"), Some(Equipment::Tk));
        assert_eq!(Equipment::parse("all"), None);
        assert_eq!(Equipment::Vp.code(), "vp");
    }
}
