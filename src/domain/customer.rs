// ============================================================
// Layer 3 — Customer Attributes
// ============================================================
// The record a single form submission produces. Built fresh for
// every prediction, never mutated, dropped once scored.
//
// Every categorical field is a closed enum, so the encoder can
// only ever see values from the fixed value sets. Text input
// (CLI flags, JSON files) is converted through FromStr, which
// is the one place an UnknownCategory error can originate.
//
// Labels are the exact strings the form offers, e.g.
//   "Month-to-Month", "Fiber Optic", "Credit Card (Automatic)"
// Matching is trimmed and ASCII case-insensitive.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{ChurnError, Result};

/// Upper bound of the tenure slider, in months
pub const MAX_TENURE_MONTHS: u32 = 72;
pub const MAX_MONTHLY_CHARGES: f64 = 200.0;
pub const MAX_TOTAL_CHARGES: f64 = 10_000.0;

/// Look `value` up in a label table, failing with UnknownCategory.
fn parse_label<T: Copy>(field: &'static str, value: &str, table: &[(&str, T)]) -> Result<T> {
    let wanted = value.trim();
    table
        .iter()
        .find(|(label, _)| label.eq_ignore_ascii_case(wanted))
        .map(|(_, v)| *v)
        .ok_or_else(|| ChurnError::unknown_category(field, value))
}

fn label_of<T: Copy + PartialEq>(v: T, table: &[(&'static str, T)]) -> &'static str {
    table
        .iter()
        .find(|(_, candidate)| *candidate == v)
        .map(|(label, _)| *label)
        .unwrap_or("?")
}

// ─── Gender ───────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    const LABELS: [(&'static str, Gender); 2] = [("Male", Gender::Male), ("Female", Gender::Female)];
    #[cfg(test)]
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn label(self) -> &'static str {
        label_of(self, &Self::LABELS)
    }
}

impl FromStr for Gender {
    type Err = ChurnError;
    fn from_str(s: &str) -> Result<Self> {
        parse_label("gender", s, &Self::LABELS)
    }
}

// ─── YesNo ────────────────────────────────────────────────────────────────────
/// Answer to a plain yes/no question on the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    const LABELS: [(&'static str, YesNo); 2] = [("Yes", YesNo::Yes), ("No", YesNo::No)];
    #[cfg(test)]
    pub const ALL: [YesNo; 2] = [YesNo::Yes, YesNo::No];

    pub fn label(self) -> &'static str {
        label_of(self, &Self::LABELS)
    }

    /// Parse a yes/no answer, reporting `field` on failure
    pub fn parse_field(field: &'static str, s: &str) -> Result<Self> {
        parse_label(field, s, &Self::LABELS)
    }
}

impl FromStr for YesNo {
    type Err = ChurnError;
    fn from_str(s: &str) -> Result<Self> {
        Self::parse_field("yes/no", s)
    }
}

// ─── Contract ─────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Contract {
    MonthToMonth,
    OneYear,
    TwoYear,
}

impl Contract {
    const LABELS: [(&'static str, Contract); 3] = [
        ("Month-to-Month", Contract::MonthToMonth),
        ("One Year",       Contract::OneYear),
        ("Two Year",       Contract::TwoYear),
    ];
    #[cfg(test)]
    pub const ALL: [Contract; 3] = [Contract::MonthToMonth, Contract::OneYear, Contract::TwoYear];

    pub fn label(self) -> &'static str {
        label_of(self, &Self::LABELS)
    }
}

impl FromStr for Contract {
    type Err = ChurnError;
    fn from_str(s: &str) -> Result<Self> {
        parse_label("contract", s, &Self::LABELS)
    }
}

// ─── InternetService ──────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InternetService {
    Dsl,
    FiberOptic,
    NoInternet,
}

impl InternetService {
    const LABELS: [(&'static str, InternetService); 3] = [
        ("DSL",         InternetService::Dsl),
        ("Fiber Optic", InternetService::FiberOptic),
        ("No Internet", InternetService::NoInternet),
    ];
    #[cfg(test)]
    pub const ALL: [InternetService; 3] =
        [InternetService::Dsl, InternetService::FiberOptic, InternetService::NoInternet];

    pub fn label(self) -> &'static str {
        label_of(self, &Self::LABELS)
    }
}

impl FromStr for InternetService {
    type Err = ChurnError;
    fn from_str(s: &str) -> Result<Self> {
        parse_label("internet_service", s, &Self::LABELS)
    }
}

// ─── PaymentMethod ────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PaymentMethod {
    CreditCard,
    ElectronicCheck,
    MailedCheck,
}

impl PaymentMethod {
    const LABELS: [(&'static str, PaymentMethod); 3] = [
        ("Credit Card (Automatic)", PaymentMethod::CreditCard),
        ("Electronic Check",        PaymentMethod::ElectronicCheck),
        ("Mailed Check",            PaymentMethod::MailedCheck),
    ];
    #[cfg(test)]
    pub const ALL: [PaymentMethod; 3] =
        [PaymentMethod::CreditCard, PaymentMethod::ElectronicCheck, PaymentMethod::MailedCheck];

    pub fn label(self) -> &'static str {
        label_of(self, &Self::LABELS)
    }
}

impl FromStr for PaymentMethod {
    type Err = ChurnError;
    fn from_str(s: &str) -> Result<Self> {
        parse_label("payment_method", s, &Self::LABELS)
    }
}

// ─── Tri-state add-ons ────────────────────────────────────────────────────────
/// Multiple lines: only meaningful when the customer has phone service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PhoneAddon {
    Yes,
    No,
    NoPhoneService,
}

impl PhoneAddon {
    const LABELS: [(&'static str, PhoneAddon); 3] = [
        ("Yes",              PhoneAddon::Yes),
        ("No",               PhoneAddon::No),
        ("No Phone Service", PhoneAddon::NoPhoneService),
    ];
    #[cfg(test)]
    pub const ALL: [PhoneAddon; 3] = [PhoneAddon::Yes, PhoneAddon::No, PhoneAddon::NoPhoneService];

    pub fn label(self) -> &'static str {
        label_of(self, &Self::LABELS)
    }
}

impl FromStr for PhoneAddon {
    type Err = ChurnError;
    fn from_str(s: &str) -> Result<Self> {
        parse_label("multiple_lines", s, &Self::LABELS)
    }
}

/// Security, backup, protection, support and streaming add-ons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InternetAddon {
    Yes,
    No,
    NoInternetService,
}

impl InternetAddon {
    const LABELS: [(&'static str, InternetAddon); 3] = [
        ("Yes",                 InternetAddon::Yes),
        ("No",                  InternetAddon::No),
        ("No Internet Service", InternetAddon::NoInternetService),
    ];
    #[cfg(test)]
    pub const ALL: [InternetAddon; 3] =
        [InternetAddon::Yes, InternetAddon::No, InternetAddon::NoInternetService];

    pub fn label(self) -> &'static str {
        label_of(self, &Self::LABELS)
    }

    /// Parse an add-on answer, reporting `field` on failure
    pub fn parse_field(field: &'static str, s: &str) -> Result<Self> {
        parse_label(field, s, &Self::LABELS)
    }
}

impl FromStr for InternetAddon {
    type Err = ChurnError;
    fn from_str(s: &str) -> Result<Self> {
        Self::parse_field("internet_addon", s)
    }
}

macro_rules! display_as_label {
    ($($ty:ty),*) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    )*};
}

display_as_label!(Gender, YesNo, Contract, InternetService, PaymentMethod, PhoneAddon, InternetAddon);

// ─── CustomerAttributes ───────────────────────────────────────────────────────
/// One customer as entered on the form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerAttributes {
    pub tenure_months:     u32,
    pub monthly_charges:   f64,
    pub total_charges:     f64,
    pub gender:            Gender,
    pub senior_citizen:    YesNo,
    pub partner:           YesNo,
    pub dependents:        YesNo,
    pub phone_service:     YesNo,
    pub paperless_billing: YesNo,
    pub contract:          Contract,
    pub internet_service:  InternetService,
    pub payment_method:    PaymentMethod,
    pub multiple_lines:    PhoneAddon,
    pub online_security:   InternetAddon,
    pub online_backup:     InternetAddon,
    pub device_protection: InternetAddon,
    pub tech_support:      InternetAddon,
    pub streaming_tv:      InternetAddon,
    pub streaming_movies:  InternetAddon,
}

impl Default for CustomerAttributes {
    /// The values the form shows before the user touches anything:
    /// slider/number defaults and the first option of every selector.
    fn default() -> Self {
        Self {
            tenure_months:     12,
            monthly_charges:   50.0,
            total_charges:     600.0,
            gender:            Gender::Male,
            senior_citizen:    YesNo::Yes,
            partner:           YesNo::Yes,
            dependents:        YesNo::Yes,
            phone_service:     YesNo::Yes,
            paperless_billing: YesNo::Yes,
            contract:          Contract::MonthToMonth,
            internet_service:  InternetService::Dsl,
            payment_method:    PaymentMethod::CreditCard,
            multiple_lines:    PhoneAddon::Yes,
            online_security:   InternetAddon::Yes,
            online_backup:     InternetAddon::Yes,
            device_protection: InternetAddon::Yes,
            tech_support:      InternetAddon::Yes,
            streaming_tv:      InternetAddon::Yes,
            streaming_movies:  InternetAddon::Yes,
        }
    }
}

impl CustomerAttributes {
    /// Check the numeric fields against the ranges the form controls allow.
    pub fn validate(&self) -> Result<()> {
        if self.tenure_months > MAX_TENURE_MONTHS {
            return Err(ChurnError::InvalidAttributeValue {
                field:      "tenure_months",
                value:      f64::from(self.tenure_months),
                constraint: "must be between 0 and 72 months",
            });
        }
        check_range("monthly_charges", self.monthly_charges, MAX_MONTHLY_CHARGES,
            "must be a finite amount between 0 and 200")?;
        check_range("total_charges", self.total_charges, MAX_TOTAL_CHARGES,
            "must be a finite amount between 0 and 10000")?;
        Ok(())
    }
}

fn check_range(field: &'static str, value: f64, max: f64, constraint: &'static str) -> Result<()> {
    // NaN fails both comparisons, so test for the valid case
    if value.is_finite() && (0.0..=max).contains(&value) {
        Ok(())
    } else {
        Err(ChurnError::InvalidAttributeValue { field, value, constraint })
    }
}
