// ============================================================
// Layer 4 — Feature Encoder
// ============================================================
// Turns one CustomerAttributes record into the 32-value vector the
// classifier was trained on. Column order is the only real contract
// here, so the vector is a struct with named fields and exactly one
// place (`to_array`) that lays them out.
//
// Encodings:
//   binary fields   Yes/Male → 1, No/Female → 0
//   contract        Month-to-Month [0,0]  One Year [1,0]  Two Year [0,1]
//   internet        DSL [0,0]  Fiber Optic [1,0]  No Internet [0,1]
//   payment         Credit Card [1,0,0]  Electronic [0,1,0]  Mailed [0,0,1]
//   tri-state       [not applicable, yes] → N/A [1,0], Yes [0,1], No [0,0]
//   count           always 1
//   cltv            always 0 (not available at inference time)

use serde::Serialize;

use crate::domain::customer::{
    Contract, CustomerAttributes, Gender, InternetAddon, InternetService, PaymentMethod,
    PhoneAddon, YesNo,
};
use crate::error::Result;

pub const FEATURE_COUNT: usize = 32;

/// Column names in training order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "count",
    "gender",
    "senior_citizen",
    "partner",
    "dependents",
    "tenure_months",
    "phone_service",
    "paperless_billing",
    "monthly_charges",
    "total_charges",
    "cltv",
    "multiple_lines_no_phone_service",
    "multiple_lines_yes",
    "internet_fiber_optic",
    "internet_none",
    "online_security_no_internet_service",
    "online_security_yes",
    "online_backup_no_internet_service",
    "online_backup_yes",
    "device_protection_no_internet_service",
    "device_protection_yes",
    "tech_support_no_internet_service",
    "tech_support_yes",
    "streaming_tv_no_internet_service",
    "streaming_tv_yes",
    "streaming_movies_no_internet_service",
    "streaming_movies_yes",
    "contract_one_year",
    "contract_two_year",
    "payment_credit_card",
    "payment_electronic_check",
    "payment_mailed_check",
];

/// Two indicator bits for a Yes / No / not-applicable answer.
/// "No" is the all-zero reference state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceBits {
    pub not_applicable: f32,
    pub yes:            f32,
}

impl ServiceBits {
    const NOT_APPLICABLE: ServiceBits = ServiceBits { not_applicable: 1.0, yes: 0.0 };
    const YES:            ServiceBits = ServiceBits { not_applicable: 0.0, yes: 1.0 };
    const NO:             ServiceBits = ServiceBits { not_applicable: 0.0, yes: 0.0 };

    pub fn as_pair(self) -> [f32; 2] {
        [self.not_applicable, self.yes]
    }
}

impl From<PhoneAddon> for ServiceBits {
    fn from(v: PhoneAddon) -> Self {
        match v {
            PhoneAddon::NoPhoneService => Self::NOT_APPLICABLE,
            PhoneAddon::Yes            => Self::YES,
            PhoneAddon::No             => Self::NO,
        }
    }
}

impl From<InternetAddon> for ServiceBits {
    fn from(v: InternetAddon) -> Self {
        match v {
            InternetAddon::NoInternetService => Self::NOT_APPLICABLE,
            InternetAddon::Yes               => Self::YES,
            InternetAddon::No                => Self::NO,
        }
    }
}

/// The encoded customer, one field per model column.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub count:                    f32,
    pub gender:                   f32,
    pub senior_citizen:           f32,
    pub partner:                  f32,
    pub dependents:               f32,
    pub tenure_months:            f32,
    pub phone_service:            f32,
    pub paperless_billing:        f32,
    pub monthly_charges:          f32,
    pub total_charges:            f32,
    pub cltv:                     f32,
    pub multiple_lines:           ServiceBits,
    pub internet_fiber_optic:     f32,
    pub internet_none:            f32,
    pub online_security:          ServiceBits,
    pub online_backup:            ServiceBits,
    pub device_protection:        ServiceBits,
    pub tech_support:             ServiceBits,
    pub streaming_tv:             ServiceBits,
    pub streaming_movies:         ServiceBits,
    pub contract_one_year:        f32,
    pub contract_two_year:        f32,
    pub payment_credit_card:      f32,
    pub payment_electronic_check: f32,
    pub payment_mailed_check:     f32,
}

/// One column of the vector with its name, for diagnostics output
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NamedFeature {
    pub name:  &'static str,
    pub value: f32,
}

impl FeatureVector {
    /// The canonical layout handed to the classifier.
    pub fn to_array(&self) -> [f32; FEATURE_COUNT] {
        let [ml_na, ml_yes] = self.multiple_lines.as_pair();
        let [os_na, os_yes] = self.online_security.as_pair();
        let [ob_na, ob_yes] = self.online_backup.as_pair();
        let [dp_na, dp_yes] = self.device_protection.as_pair();
        let [ts_na, ts_yes] = self.tech_support.as_pair();
        let [tv_na, tv_yes] = self.streaming_tv.as_pair();
        let [mv_na, mv_yes] = self.streaming_movies.as_pair();
        [
            self.count,
            self.gender,
            self.senior_citizen,
            self.partner,
            self.dependents,
            self.tenure_months,
            self.phone_service,
            self.paperless_billing,
            self.monthly_charges,
            self.total_charges,
            self.cltv,
            ml_na, ml_yes,
            self.internet_fiber_optic,
            self.internet_none,
            os_na, os_yes,
            ob_na, ob_yes,
            dp_na, dp_yes,
            ts_na, ts_yes,
            tv_na, tv_yes,
            mv_na, mv_yes,
            self.contract_one_year,
            self.contract_two_year,
            self.payment_credit_card,
            self.payment_electronic_check,
            self.payment_mailed_check,
        ]
    }

    pub fn named(&self) -> Vec<NamedFeature> {
        FEATURE_NAMES
            .iter()
            .zip(self.to_array())
            .map(|(&name, value)| NamedFeature { name, value })
            .collect()
    }
}

fn yes_no(v: YesNo) -> f32 {
    match v {
        YesNo::Yes => 1.0,
        YesNo::No  => 0.0,
    }
}

fn gender(v: Gender) -> f32 {
    match v {
        Gender::Male   => 1.0,
        Gender::Female => 0.0,
    }
}

fn contract(v: Contract) -> [f32; 2] {
    match v {
        Contract::MonthToMonth => [0.0, 0.0],
        Contract::OneYear      => [1.0, 0.0],
        Contract::TwoYear      => [0.0, 1.0],
    }
}

fn internet(v: InternetService) -> [f32; 2] {
    match v {
        InternetService::Dsl        => [0.0, 0.0],
        InternetService::FiberOptic => [1.0, 0.0],
        InternetService::NoInternet => [0.0, 1.0],
    }
}

fn payment(v: PaymentMethod) -> [f32; 3] {
    match v {
        PaymentMethod::CreditCard      => [1.0, 0.0, 0.0],
        PaymentMethod::ElectronicCheck => [0.0, 1.0, 0.0],
        PaymentMethod::MailedCheck     => [0.0, 0.0, 1.0],
    }
}

/// Validate `attrs` and encode it in training column order.
pub fn encode(attrs: &CustomerAttributes) -> Result<FeatureVector> {
    attrs.validate()?;

    let [contract_one_year, contract_two_year] = contract(attrs.contract);
    let [internet_fiber_optic, internet_none] = internet(attrs.internet_service);
    let [payment_credit_card, payment_electronic_check, payment_mailed_check] =
        payment(attrs.payment_method);

    let features = FeatureVector {
        count:             1.0,
        gender:            gender(attrs.gender),
        senior_citizen:    yes_no(attrs.senior_citizen),
        partner:           yes_no(attrs.partner),
        dependents:        yes_no(attrs.dependents),
        tenure_months:     attrs.tenure_months as f32,
        phone_service:     yes_no(attrs.phone_service),
        paperless_billing: yes_no(attrs.paperless_billing),
        monthly_charges:   attrs.monthly_charges as f32,
        total_charges:     attrs.total_charges as f32,
        cltv:              0.0,
        multiple_lines:    attrs.multiple_lines.into(),
        internet_fiber_optic,
        internet_none,
        online_security:   attrs.online_security.into(),
        online_backup:     attrs.online_backup.into(),
        device_protection: attrs.device_protection.into(),
        tech_support:      attrs.tech_support.into(),
        streaming_tv:      attrs.streaming_tv.into(),
        streaming_movies:  attrs.streaming_movies.into(),
        contract_one_year,
        contract_two_year,
        payment_credit_card,
        payment_electronic_check,
        payment_mailed_check,
    };

    tracing::debug!(?features, "Encoded customer");
    Ok(features)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChurnError;

    fn column(name: &str) -> usize {
        FEATURE_NAMES.iter().position(|n| *n == name).unwrap()
    }

    /// The walkthrough customer: month-to-month fiber, electronic check, no add-ons
    fn scenario() -> CustomerAttributes {
        CustomerAttributes {
            tenure_months:     12,
            monthly_charges:   50.0,
            total_charges:     600.0,
            gender:            Gender::Male,
            senior_citizen:    YesNo::No,
            partner:           YesNo::No,
            dependents:        YesNo::No,
            phone_service:     YesNo::Yes,
            paperless_billing: YesNo::Yes,
            contract:          Contract::MonthToMonth,
            internet_service:  InternetService::FiberOptic,
            payment_method:    PaymentMethod::ElectronicCheck,
            multiple_lines:    PhoneAddon::No,
            online_security:   InternetAddon::No,
            online_backup:     InternetAddon::No,
            device_protection: InternetAddon::No,
            tech_support:      InternetAddon::No,
            streaming_tv:      InternetAddon::No,
            streaming_movies:  InternetAddon::No,
        }
    }

    #[test]
    fn test_scenario_vector() {
        let v = encode(&scenario()).unwrap().to_array();
        let expected: [f32; FEATURE_COUNT] = [
            1.0,                     // count
            1.0, 0.0, 0.0, 0.0,      // gender, senior, partner, dependents
            12.0, 1.0, 1.0,          // tenure, phone, paperless
            50.0, 600.0, 0.0,        // monthly, total, cltv
            0.0, 0.0,                // multiple lines
            1.0, 0.0,                // internet
            0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
            0.0, 0.0,                // contract
            0.0, 1.0, 0.0,           // payment
        ];
        assert_eq!(v, expected);
    }

    #[test]
    fn test_names_match_layout() {
        let features = encode(&scenario()).unwrap();
        let named = features.named();
        assert_eq!(named.len(), FEATURE_COUNT);
        assert_eq!(named[column("tenure_months")].value, 12.0);
        assert_eq!(named[column("internet_fiber_optic")].value, 1.0);
        assert_eq!(named[column("payment_electronic_check")].value, 1.0);
        assert_eq!(column("count"), 0);
        assert_eq!(column("cltv"), 10);
        assert_eq!(column("payment_mailed_check"), FEATURE_COUNT - 1);
    }

    #[test]
    fn test_binary_fields() {
        for g in Gender::ALL {
            let attrs = CustomerAttributes { gender: g, ..scenario() };
            let v = encode(&attrs).unwrap();
            assert_eq!(v.gender, if g == Gender::Male { 1.0 } else { 0.0 });
        }
        for answer in YesNo::ALL {
            let expected = if answer == YesNo::Yes { 1.0 } else { 0.0 };
            let attrs = CustomerAttributes {
                senior_citizen:    answer,
                partner:           answer,
                dependents:        answer,
                phone_service:     answer,
                paperless_billing: answer,
                ..scenario()
            };
            let v = encode(&attrs).unwrap();
            for got in [v.senior_citizen, v.partner, v.dependents, v.phone_service, v.paperless_billing] {
                assert_eq!(got, expected);
            }
        }
    }

    #[test]
    fn test_contract_pairs_are_exclusive() {
        let mut seen = Vec::new();
        for c in Contract::ALL {
            let v = encode(&CustomerAttributes { contract: c, ..scenario() }).unwrap();
            let pair = [v.contract_one_year, v.contract_two_year];
            assert!(pair == [0.0, 0.0] || pair == [1.0, 0.0] || pair == [0.0, 1.0]);
            assert!(!seen.contains(&pair));
            seen.push(pair);
        }
        let v = encode(&CustomerAttributes { contract: Contract::MonthToMonth, ..scenario() }).unwrap();
        assert_eq!([v.contract_one_year, v.contract_two_year], [0.0, 0.0]);
    }

    #[test]
    fn test_internet_reference_category_is_all_zero() {
        for s in InternetService::ALL {
            let v = encode(&CustomerAttributes { internet_service: s, ..scenario() }).unwrap();
            let sum = v.internet_fiber_optic + v.internet_none;
            assert!(sum <= 1.0);
            assert_eq!(sum == 0.0, s == InternetService::Dsl);
        }
    }

    #[test]
    fn test_payment_is_one_hot() {
        for p in PaymentMethod::ALL {
            let v = encode(&CustomerAttributes { payment_method: p, ..scenario() }).unwrap();
            let sum = v.payment_credit_card + v.payment_electronic_check + v.payment_mailed_check;
            assert_eq!(sum, 1.0);
        }
    }

    #[test]
    fn test_tri_state_patterns_are_distinct() {
        let patterns: Vec<[f32; 2]> = InternetAddon::ALL
            .iter()
            .map(|&a| ServiceBits::from(a).as_pair())
            .collect();
        assert_eq!(patterns, vec![[0.0, 1.0], [0.0, 0.0], [1.0, 0.0]]);

        let patterns: Vec<[f32; 2]> = PhoneAddon::ALL
            .iter()
            .map(|&a| ServiceBits::from(a).as_pair())
            .collect();
        assert_eq!(patterns, vec![[0.0, 1.0], [0.0, 0.0], [1.0, 0.0]]);
    }

    #[test]
    fn test_each_add_on_lands_in_its_own_columns() {
        type Set = fn(&mut CustomerAttributes, PhoneAddon, InternetAddon);
        let fields: [(&str, &str, Set); 7] = [
            ("multiple_lines", "no_phone_service", |c, p, _| c.multiple_lines = p),
            ("online_security", "no_internet_service", |c, _, i| c.online_security = i),
            ("online_backup", "no_internet_service", |c, _, i| c.online_backup = i),
            ("device_protection", "no_internet_service", |c, _, i| c.device_protection = i),
            ("tech_support", "no_internet_service", |c, _, i| c.tech_support = i),
            ("streaming_tv", "no_internet_service", |c, _, i| c.streaming_tv = i),
            ("streaming_movies", "no_internet_service", |c, _, i| c.streaming_movies = i),
        ];
        let add_on_columns: Vec<usize> = fields
            .iter()
            .flat_map(|(field, na, _)| {
                [column(&format!("{field}_{na}")), column(&format!("{field}_yes"))]
            })
            .collect();
        assert_eq!(add_on_columns.len(), 14);

        let states = [
            (PhoneAddon::Yes, InternetAddon::Yes, ServiceBits::YES),
            (PhoneAddon::No, InternetAddon::No, ServiceBits::NO),
            (PhoneAddon::NoPhoneService, InternetAddon::NoInternetService, ServiceBits::NOT_APPLICABLE),
        ];
        for (field, na, set) in fields {
            let own = [column(&format!("{field}_{na}")), column(&format!("{field}_yes"))];
            for (phone, net, expected) in states {
                let mut attrs = scenario();
                set(&mut attrs, phone, net);
                let v = encode(&attrs).unwrap().to_array();

                assert_eq!([v[own[0]], v[own[1]]], expected.as_pair(), "{field} -> {expected:?}");
                for &i in add_on_columns.iter().filter(|i| !own.contains(i)) {
                    assert_eq!(v[i], 0.0, "{field} -> {expected:?} leaked into {}", FEATURE_NAMES[i]);
                }
            }
        }
    }

    #[test]
    fn test_invalid_numbers_fail_before_encoding() {
        let attrs = CustomerAttributes { monthly_charges: 250.0, ..scenario() };
        assert!(matches!(
            encode(&attrs),
            Err(ChurnError::InvalidAttributeValue { field: "monthly_charges", .. })
        ));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;
        use proptest::sample::select;

        fn any_customer() -> impl Strategy<Value = CustomerAttributes> {
            let numbers = (0u32..=72, 0.0f64..=200.0, 0.0f64..=10_000.0);
            let flags = (
                select(Gender::ALL.to_vec()),
                select(YesNo::ALL.to_vec()),
                select(YesNo::ALL.to_vec()),
                select(YesNo::ALL.to_vec()),
                select(YesNo::ALL.to_vec()),
                select(YesNo::ALL.to_vec()),
            );
            let choices = (
                select(Contract::ALL.to_vec()),
                select(InternetService::ALL.to_vec()),
                select(PaymentMethod::ALL.to_vec()),
                select(PhoneAddon::ALL.to_vec()),
            );
            let addons = proptest::collection::vec(select(InternetAddon::ALL.to_vec()), 6);
            (numbers, flags, choices, addons).prop_map(
                |((tenure, monthly, total), (g, sc, pa, de, ph, pb), (c, i, p, ml), a)| {
                    CustomerAttributes {
                        tenure_months:     tenure,
                        monthly_charges:   monthly,
                        total_charges:     total,
                        gender:            g,
                        senior_citizen:    sc,
                        partner:           pa,
                        dependents:        de,
                        phone_service:     ph,
                        paperless_billing: pb,
                        contract:          c,
                        internet_service:  i,
                        payment_method:    p,
                        multiple_lines:    ml,
                        online_security:   a[0],
                        online_backup:     a[1],
                        device_protection: a[2],
                        tech_support:      a[3],
                        streaming_tv:      a[4],
                        streaming_movies:  a[5],
                    }
                },
            )
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(256))]

            #[test]
            fn constants_and_indicators_hold_for_every_customer(attrs in any_customer()) {
                let v = encode(&attrs).unwrap().to_array();
                prop_assert_eq!(v.len(), FEATURE_COUNT);
                prop_assert_eq!(v[column("count")], 1.0);
                prop_assert_eq!(v[column("cltv")], 0.0);

                let numeric = ["tenure_months", "monthly_charges", "total_charges"];
                for (i, name) in FEATURE_NAMES.iter().enumerate() {
                    if !numeric.contains(name) {
                        prop_assert!(v[i] == 0.0 || v[i] == 1.0, "{} = {}", name, v[i]);
                    }
                }

                let payment: f32 = v[29..32].iter().sum();
                prop_assert_eq!(payment, 1.0);
                prop_assert!(v[27] + v[28] <= 1.0);
                prop_assert!(v[13] + v[14] <= 1.0);
                for pair in v[11..13].chunks(2).chain(v[15..27].chunks(2)) {
                    prop_assert!(pair[0] + pair[1] <= 1.0);
                }
            }
        }
    }
}
