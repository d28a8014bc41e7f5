// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap, hands the work to Layer 2, and
// renders the results. All business logic lives below this layer.

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, InspectArgs, OutputArgs, PredictArgs, PredictFileArgs};

use crate::application::inspect_use_case::InspectUseCase;
use crate::application::predict_use_case::{ChurnAssessment, PredictUseCase};
use crate::data::loader::JsonCustomerLoader;
use crate::domain::customer::CustomerAttributes;

#[derive(Parser, Debug)]
#[command(
    name = "churn-predictor",
    version,
    about = "Predict whether a customer is likely to churn from their service and account details."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Predict(args)     => run_predict(args),
            Commands::PredictFile(args) => run_predict_file(args),
            Commands::Inspect(args)     => run_inspect(args),
        }
    }
}

fn run_predict(args: PredictArgs) -> Result<()> {
    let customer = CustomerAttributes::from(&args);
    let use_case = PredictUseCase::new(&args.output.model)?;
    let assessment = use_case.assess(&customer)?;
    print_assessments(&[assessment], &args.output)
}

fn run_predict_file(args: PredictFileArgs) -> Result<()> {
    tracing::info!("Scoring customers from: {}", args.input);
    let use_case = PredictUseCase::new(&args.output.model)?;
    let assessments = use_case.assess_all(&JsonCustomerLoader::new(&args.input))?;
    print_assessments(&assessments, &args.output)
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let report = InspectUseCase::execute(&args.model)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}

fn print_assessments(assessments: &[ChurnAssessment], output: &OutputArgs) -> Result<()> {
    if output.json {
        let reports: Vec<_> = assessments.iter().map(|a| a.report(output.show_features)).collect();
        // A single customer prints as an object, several as an array
        let json = match reports.as_slice() {
            [one] => serde_json::to_string_pretty(one)?,
            many  => serde_json::to_string_pretty(many)?,
        };
        println!("{json}");
        return Ok(());
    }

    for (i, assessment) in assessments.iter().enumerate() {
        if assessments.len() > 1 {
            println!("\nCustomer #{}", i + 1);
        }
        if output.show_features {
            println!("Features:");
            for feature in assessment.features.named() {
                println!("  {:<40} {}", feature.name, feature.value);
            }
        }
        println!("{}", assessment.prediction.render());
    }
    Ok(())
}
