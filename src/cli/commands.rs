// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Three subcommands:
//   predict       one customer described by flags (the form)
//   predict-file  every customer in a JSON file
//   inspect       describe a model artifact
//
// Categorical flags are parsed by the domain FromStr impls, so the
// accepted spellings are the form labels ("Fiber Optic", "One Year",
// "Credit Card (Automatic)" ...) and a typo is an UnknownCategory
// error from clap. Defaults are the form's initial state.

use clap::{Args, Subcommand};

use crate::domain::customer::{
    Contract, CustomerAttributes, Gender, InternetAddon, InternetService, PaymentMethod,
    PhoneAddon, YesNo,
};

pub const DEFAULT_MODEL_PATH: &str = "models/churn_model.json";

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Predict churn for one customer
    Predict(PredictArgs),

    /// Predict churn for every customer in a JSON file
    PredictFile(PredictFileArgs),

    /// Show what a model artifact expects
    Inspect(InspectArgs),
}

/// Where the model lives and how to print results
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// XGBoost JSON model file, or a burn checkpoint directory
    #[arg(long, default_value = DEFAULT_MODEL_PATH)]
    pub model: String,

    /// Print results as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Also print the encoded feature vector
    #[arg(long)]
    pub show_features: bool,
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    #[command(flatten)]
    pub output: OutputArgs,

    /// Tenure in months (0-72)
    #[arg(long, default_value_t = 12)]
    pub tenure: u32,

    /// Monthly charges in dollars (0-200)
    #[arg(long, default_value_t = 50.0)]
    pub monthly_charges: f64,

    /// Total charges in dollars (0-10000)
    #[arg(long, default_value_t = 600.0)]
    pub total_charges: f64,

    /// Male | Female
    #[arg(long, default_value = "Male", value_parser = parse::<Gender>)]
    pub gender: Gender,

    /// Yes | No
    #[arg(long, default_value = "Yes", value_parser = parse::<YesNo>)]
    pub senior_citizen: YesNo,

    /// Yes | No
    #[arg(long, default_value = "Yes", value_parser = parse::<YesNo>)]
    pub partner: YesNo,

    /// Yes | No
    #[arg(long, default_value = "Yes", value_parser = parse::<YesNo>)]
    pub dependents: YesNo,

    /// Yes | No
    #[arg(long, default_value = "Yes", value_parser = parse::<YesNo>)]
    pub phone_service: YesNo,

    /// Yes | No
    #[arg(long, default_value = "Yes", value_parser = parse::<YesNo>)]
    pub paperless_billing: YesNo,

    /// "Month-to-Month" | "One Year" | "Two Year"
    #[arg(long, default_value = "Month-to-Month", value_parser = parse::<Contract>)]
    pub contract: Contract,

    /// DSL | "Fiber Optic" | "No Internet"
    #[arg(long, default_value = "DSL", value_parser = parse::<InternetService>)]
    pub internet_service: InternetService,

    /// "Credit Card (Automatic)" | "Electronic Check" | "Mailed Check"
    #[arg(long, default_value = "Credit Card (Automatic)", value_parser = parse::<PaymentMethod>)]
    pub payment_method: PaymentMethod,

    /// Yes | No | "No Phone Service"
    #[arg(long, default_value = "Yes", value_parser = parse::<PhoneAddon>)]
    pub multiple_lines: PhoneAddon,

    /// Yes | No | "No Internet Service"
    #[arg(long, default_value = "Yes", value_parser = parse::<InternetAddon>)]
    pub online_security: InternetAddon,

    /// Yes | No | "No Internet Service"
    #[arg(long, default_value = "Yes", value_parser = parse::<InternetAddon>)]
    pub online_backup: InternetAddon,

    /// Yes | No | "No Internet Service"
    #[arg(long, default_value = "Yes", value_parser = parse::<InternetAddon>)]
    pub device_protection: InternetAddon,

    /// Yes | No | "No Internet Service"
    #[arg(long, default_value = "Yes", value_parser = parse::<InternetAddon>)]
    pub tech_support: InternetAddon,

    /// Yes | No | "No Internet Service"
    #[arg(long, default_value = "Yes", value_parser = parse::<InternetAddon>)]
    pub streaming_tv: InternetAddon,

    /// Yes | No | "No Internet Service"
    #[arg(long, default_value = "Yes", value_parser = parse::<InternetAddon>)]
    pub streaming_movies: InternetAddon,
}

fn parse<T: std::str::FromStr<Err = crate::error::ChurnError>>(
    s: &str,
) -> Result<T, crate::error::ChurnError> {
    s.parse()
}

/// The application layer never sees clap types.
impl From<&PredictArgs> for CustomerAttributes {
    fn from(a: &PredictArgs) -> Self {
        CustomerAttributes {
            tenure_months:     a.tenure,
            monthly_charges:   a.monthly_charges,
            total_charges:     a.total_charges,
            gender:            a.gender,
            senior_citizen:    a.senior_citizen,
            partner:           a.partner,
            dependents:        a.dependents,
            phone_service:     a.phone_service,
            paperless_billing: a.paperless_billing,
            contract:          a.contract,
            internet_service:  a.internet_service,
            payment_method:    a.payment_method,
            multiple_lines:    a.multiple_lines,
            online_security:   a.online_security,
            online_backup:     a.online_backup,
            device_protection: a.device_protection,
            tech_support:      a.tech_support,
            streaming_tv:      a.streaming_tv,
            streaming_movies:  a.streaming_movies,
        }
    }
}

#[derive(Args, Debug)]
pub struct PredictFileArgs {
    #[command(flatten)]
    pub output: OutputArgs,

    /// JSON file with one customer object or an array of them
    #[arg(long)]
    pub input: String,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// XGBoost JSON model file, or a burn checkpoint directory
    #[arg(long, default_value = DEFAULT_MODEL_PATH)]
    pub model: String,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}
