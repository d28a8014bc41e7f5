// ============================================================
// Layer 4 — Customer Record Loader
// ============================================================
// Reads customers from a JSON file, for scoring several records
// in one run. The file holds either a single object or an array:
//
//   {
//     "tenure_months": 12, "monthly_charges": 50.0, "total_charges": 600.0,
//     "gender": "Male", "senior_citizen": "No", ...,
//     "contract": "Month-to-Month", "internet_service": "Fiber Optic",
//     "payment_method": "Electronic Check", "multiple_lines": "No", ...
//   }
//
// Categorical values arrive as free text here, so every one of
// them goes through the domain FromStr and may fail with
// UnknownCategory. Numeric ranges are checked as well.

use std::{fs, path::PathBuf};

use serde::Deserialize;

use crate::domain::customer::{CustomerAttributes, InternetAddon, YesNo};
use crate::domain::traits::CustomerSource;
use crate::error::{ChurnError, Result};

/// A customer exactly as written in the file, before validation
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawCustomerRecord {
    pub tenure_months:     u32,
    pub monthly_charges:   f64,
    pub total_charges:     f64,
    pub gender:            String,
    pub senior_citizen:    String,
    pub partner:           String,
    pub dependents:        String,
    pub phone_service:     String,
    pub paperless_billing: String,
    pub contract:          String,
    pub internet_service:  String,
    pub payment_method:    String,
    pub multiple_lines:    String,
    pub online_security:   String,
    pub online_backup:     String,
    pub device_protection: String,
    pub tech_support:      String,
    pub streaming_tv:      String,
    pub streaming_movies:  String,
}

impl TryFrom<RawCustomerRecord> for CustomerAttributes {
    type Error = ChurnError;

    fn try_from(raw: RawCustomerRecord) -> Result<Self> {
        let attrs = CustomerAttributes {
            tenure_months:     raw.tenure_months,
            monthly_charges:   raw.monthly_charges,
            total_charges:     raw.total_charges,
            gender:            raw.gender.parse()?,
            senior_citizen:    YesNo::parse_field("senior_citizen", &raw.senior_citizen)?,
            partner:           YesNo::parse_field("partner", &raw.partner)?,
            dependents:        YesNo::parse_field("dependents", &raw.dependents)?,
            phone_service:     YesNo::parse_field("phone_service", &raw.phone_service)?,
            paperless_billing: YesNo::parse_field("paperless_billing", &raw.paperless_billing)?,
            contract:          raw.contract.parse()?,
            internet_service:  raw.internet_service.parse()?,
            payment_method:    raw.payment_method.parse()?,
            multiple_lines:    raw.multiple_lines.parse()?,
            online_security:   InternetAddon::parse_field("online_security", &raw.online_security)?,
            online_backup:     InternetAddon::parse_field("online_backup", &raw.online_backup)?,
            device_protection: InternetAddon::parse_field("device_protection", &raw.device_protection)?,
            tech_support:      InternetAddon::parse_field("tech_support", &raw.tech_support)?,
            streaming_tv:      InternetAddon::parse_field("streaming_tv", &raw.streaming_tv)?,
            streaming_movies:  InternetAddon::parse_field("streaming_movies", &raw.streaming_movies)?,
        };
        attrs.validate()?;
        Ok(attrs)
    }
}

/// Accepts `{...}` as well as `[{...}, {...}]`
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(RawCustomerRecord),
    Many(Vec<RawCustomerRecord>),
}

/// Parse customer records from a JSON string.
pub fn parse_customers(json: &str) -> std::result::Result<Vec<RawCustomerRecord>, serde_json::Error> {
    Ok(match serde_json::from_str::<OneOrMany>(json)? {
        OneOrMany::One(record)   => vec![record],
        OneOrMany::Many(records) => records,
    })
}

/// Loads customers from a JSON file.
/// Implements the CustomerSource trait from Layer 3.
pub struct JsonCustomerLoader {
    path: PathBuf,
}

impl JsonCustomerLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CustomerSource for JsonCustomerLoader {
    fn load_all(&self) -> Result<Vec<CustomerAttributes>> {
        let text = fs::read_to_string(&self.path).map_err(|e| ChurnError::InvalidInput {
            path:   self.path.clone(),
            reason: e.to_string(),
        })?;
        let raw = parse_customers(&text).map_err(|e| ChurnError::InvalidInput {
            path:   self.path.clone(),
            reason: e.to_string(),
        })?;

        let customers = raw
            .into_iter()
            .map(CustomerAttributes::try_from)
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(
            "Loaded {} customer record(s) from '{}'",
            customers.len(),
            self.path.display()
        );
        Ok(customers)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::customer::{Contract, InternetService, PaymentMethod, PhoneAddon};
    use std::io::Write;

    const RECORD: &str = r#"{
        "tenure_months": 12, "monthly_charges": 50.0, "total_charges": 600.0,
        "gender": "Male", "senior_citizen": "No", "partner": "No", "dependents": "No",
        "phone_service": "Yes", "paperless_billing": "Yes",
        "contract": "Month-to-Month", "internet_service": "Fiber Optic",
        "payment_method": "Electronic Check", "multiple_lines": "No",
        "online_security": "No", "online_backup": "No", "device_protection": "No",
        "tech_support": "No", "streaming_tv": "No", "streaming_movies": "No"
    }"#;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn test_single_object() {
        let raw = parse_customers(RECORD).unwrap();
        assert_eq!(raw.len(), 1);
        let attrs = CustomerAttributes::try_from(raw[0].clone()).unwrap();
        assert_eq!(attrs.contract, Contract::MonthToMonth);
        assert_eq!(attrs.internet_service, InternetService::FiberOptic);
        assert_eq!(attrs.payment_method, PaymentMethod::ElectronicCheck);
        assert_eq!(attrs.multiple_lines, PhoneAddon::No);
    }

    #[test]
    fn test_array_keeps_order() {
        let two_year = RECORD.replace("Month-to-Month", "Two Year");
        let file = write_temp(&format!("[{RECORD}, {two_year}]"));
        let customers = JsonCustomerLoader::new(file.path()).load_all().unwrap();
        assert_eq!(customers.len(), 2);
        assert_eq!(customers[0].contract, Contract::MonthToMonth);
        assert_eq!(customers[1].contract, Contract::TwoYear);
    }

    #[test]
    fn test_unknown_category_names_the_field() {
        let bad = RECORD.replace(r#""tech_support": "No""#, r#""tech_support": "Sometimes""#);
        let file = write_temp(&bad);
        let err = JsonCustomerLoader::new(file.path()).load_all().unwrap_err();
        match err {
            ChurnError::UnknownCategory { field, value } => {
                assert_eq!(field, "tech_support");
                assert_eq!(value, "Sometimes");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_tenure() {
        let bad = RECORD.replace(r#""tenure_months": 12"#, r#""tenure_months": 100"#);
        let raw = parse_customers(&bad).unwrap().remove(0);
        assert!(matches!(
            CustomerAttributes::try_from(raw),
            Err(ChurnError::InvalidAttributeValue { field: "tenure_months", .. })
        ));
    }

    #[test]
    fn test_missing_file_and_bad_json() {
        let err = JsonCustomerLoader::new("/nonexistent/customers.json").load_all().unwrap_err();
        assert!(matches!(err, ChurnError::InvalidInput { .. }));

        let file = write_temp("{ not json");
        let err = JsonCustomerLoader::new(file.path()).load_all().unwrap_err();
        assert!(matches!(err, ChurnError::InvalidInput { .. }));
    }

    #[test]
    fn test_unexpected_field_is_rejected() {
        let extra = RECORD.replacen('{', r#"{ "cltv": 4000, "#, 1);
        assert!(parse_customers(&extra).is_err());
    }
}
