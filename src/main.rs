use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::info;

use loan_intake::config::AppConfig;
use loan_intake::error::AppError;
use loan_intake::telemetry;
use loan_intake::workflows::loan::{
    Collateral, DigitEntry, FileAttachment, LoanWizardInstance, SubmissionError,
    SubmissionPayload, SubmissionReceipt, SubmissionSink, VerificationTarget, WizardStep,
};

#[derive(Parser, Debug)]
#[command(
    name = "Welfare Scheme Loan Intake",
    about = "Walk the loan application wizard from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a scripted wizard session end to end and print the payload
    Demo,
    /// List the wizard steps in order
    Steps,
}

/// Sink that prints the payload instead of persisting it.
struct StdoutSink;

impl SubmissionSink for StdoutSink {
    fn accept(&self, payload: SubmissionPayload) -> Result<SubmissionReceipt, SubmissionError> {
        let rendered = serde_json::to_string_pretty(&payload)
            .map_err(|err| SubmissionError::Unavailable(err.to_string()))?;
        println!("{rendered}");
        Ok(SubmissionReceipt {
            reference: payload.reference,
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config)?;

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Demo) {
        Command::Steps => {
            for step in WizardStep::ALL {
                println!("{:>2}. {}", step.index(), step.label());
            }
            Ok(())
        }
        Command::Demo => run_demo(config).await,
    }
}

async fn run_demo(config: AppConfig) -> Result<(), AppError> {
    let today = Local::now().date_naive();
    let mut wizard = LoanWizardInstance::new(config.wizard);

    wizard.set_loan_amount(30_000);
    {
        let loan = &mut wizard.state_mut().loan;
        loan.application_type = "Computer Training".to_string();
        loan.tenure_years = Some(3);
    }
    advance(&mut wizard)?;

    verify(&mut wizard, VerificationTarget::Applicant, today).await?;
    {
        let kyc = &mut wizard.state_mut().kyc;
        kyc.pan = "ABCDE1234F".to_string();
        kyc.bank_name = "State Bank of India".to_string();
        kyc.account_number = "110025634401".to_string();
        kyc.confirm_account_number = "110025634401".to_string();
        kyc.ifsc_code = "SBIN0001234".to_string();
        kyc.account_holder_name = "Ramesh Kumar".to_string();
    }
    advance(&mut wizard)?;

    {
        let basic = &mut wizard.state_mut().basic;
        basic.father_husband_name = "Mohan Kumar".to_string();
        basic.mother_full_name = "Sita Kumar".to_string();
        basic.basic_education = "12th".to_string();
        basic.mobile = "9812345678".to_string();
        basic.email = "ramesh.kumar@example.com".to_string();
    }
    advance(&mut wizard)?;

    wizard.state_mut().address.same_as_current = true;
    advance(&mut wizard)?;

    {
        let state = wizard.state_mut();
        let id = state.family_members.entries()[0].id;
        state.family_members.update(id, |member| {
            member.person_name = "Sunita Kumar".to_string();
            member.relation = "Spouse".to_string();
            member.age = "33".to_string();
            member.occupation = "Tailor".to_string();
        });
    }
    advance(&mut wizard)?;

    wizard.state_mut().collateral = Some(Collateral::Gold {
        weight: "20g".to_string(),
        purity: "22K".to_string(),
    });
    advance(&mut wizard)?;

    verify(&mut wizard, VerificationTarget::Guarantor, today).await?;
    {
        let guarantor = &mut wizard.state_mut().guarantor;
        guarantor.relationship = "Friend".to_string();
        guarantor.guarantee_amount = "30000".to_string();
    }
    advance(&mut wizard)?;

    {
        let state = wizard.state_mut();
        let id = state.witnesses.entries()[0].id;
        state.witnesses.update(id, |witness| {
            witness.name = "Anil Joshi".to_string();
            witness.relation = "Neighbour".to_string();
            witness.contact = "9765432109".to_string();
        });
    }
    advance(&mut wizard)?;

    {
        let state = wizard.state_mut();
        let id = state.documents.entries()[0].id;
        state.documents.update(id, |document| {
            document.document_type = "Ration Card".to_string();
            document.attachment = Some(FileAttachment {
                display_name: "ration-card.pdf".to_string(),
                handle: "picker://ration-card".to_string(),
            });
        });
    }
    advance(&mut wizard)?;

    {
        let vendor = &mut wizard.state_mut().vendor;
        vendor.vendor_type = "Training Institute".to_string();
        vendor.vendor_name = "Skill Bridge Academy".to_string();
        vendor.vendor_contact = "020-24431234".to_string();
        vendor.vendor_address = "8 FC Road, Pune".to_string();
        vendor.vendor_pincode = "411004".to_string();
        vendor.amount_to_be_paid = "30000".to_string();
    }

    let receipt = wizard.submit(&StdoutSink, today).map_err(AppError::Wizard)?;
    info!(reference = %receipt.reference.0, "demo session submitted");
    Ok(())
}

fn advance(wizard: &mut LoanWizardInstance) -> Result<(), AppError> {
    let step = wizard
        .advance()
        .map_err(|failure| AppError::Wizard(failure.into()))?;
    info!(step = step.index(), label = step.label(), "moved to step");
    Ok(())
}

async fn verify(
    wizard: &mut LoanWizardInstance,
    target: VerificationTarget,
    today: chrono::NaiveDate,
) -> Result<(), AppError> {
    let mut ticket = None;
    for digit in "123456789012".chars() {
        let entry = wizard
            .enter_digit(target, &digit.to_string())
            .map_err(|err| AppError::Wizard(err.into()))?;
        if let DigitEntry::BeganValidating(issued) = entry {
            ticket = Some(issued);
        }
    }

    if let Some(ticket) = ticket {
        let delay = wizard.begin_validation_delay(ticket);
        if let Some(fired) = delay.ticket().await {
            wizard
                .complete_validation(fired)
                .map_err(|err| AppError::Wizard(err.into()))?;
        }
    }

    wizard
        .set_otp(target, "482913")
        .map_err(|err| AppError::Wizard(err.into()))?;
    wizard
        .submit_otp(target, today)
        .map_err(|err| AppError::Wizard(err.into()))?;
    info!(flow = target.label(), "identity verified");
    Ok(())
}
