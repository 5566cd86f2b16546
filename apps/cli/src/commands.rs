use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use serde_json::Value;

use campusdesk_connect::{ApiClient, Session};
use campusdesk_core::admissions::{AdmissionDetails, AdmissionService, AdmissionServiceTrait};
use campusdesk_core::agents::AgentRepositoryTrait;
use campusdesk_core::constants::AGENT_LIST_LIMIT;
use campusdesk_core::payments::{
    Attachment, PaymentDraft, PaymentEntry, PaymentService, PaymentServiceTrait,
    ServiceChargeOption, TransactionRefStatus,
};
use campusdesk_core::users::CurrentUser;
use campusdesk_core::utils::money_utils::{format_currency, format_optional_currency};

use crate::config::Config;

/// Services wired to one API client for the configured user.
pub struct App {
    client: Arc<ApiClient>,
    payments: Arc<dyn PaymentServiceTrait>,
    admissions: AdmissionService,
}

impl App {
    pub fn connect(config: &Config) -> anyhow::Result<Self> {
        let session = Session::new(
            config.access_token.clone(),
            CurrentUser {
                id: config.user_id.clone(),
                name: config.user_name.clone(),
                role: config.user_role,
            },
        );
        let client = Arc::new(ApiClient::new(
            &config.api_url,
            &session,
            config.request_timeout,
        )?);

        let payments: Arc<dyn PaymentServiceTrait> = Arc::new(PaymentService::new(
            client.clone(),
            client.clone(),
            client.clone(),
            session.user.clone(),
        ));
        let admissions = AdmissionService::new(client.clone(), session.user);

        Ok(Self {
            client,
            payments,
            admissions,
        })
    }

    pub async fn details(&self, admission_id: &str) -> anyhow::Result<()> {
        let details = self.admissions.get_admission_details(admission_id).await?;
        print_details(&details);
        Ok(())
    }

    pub async fn agents(&self) -> anyhow::Result<()> {
        let agents = self.client.list_agents(AGENT_LIST_LIMIT).await?;
        for agent in agents.iter().filter(|a| a.is_active) {
            let kind = agent.agent_type.map(|t| t.label()).unwrap_or("-");
            println!("{:<26} {:<13} {}", agent.id, kind, agent.name);
        }
        Ok(())
    }

    pub async fn check_ref(&self, reference: &str) -> anyhow::Result<()> {
        match self.payments.check_transaction_ref(reference).await? {
            TransactionRefStatus::Blank => println!("Blank reference; nothing to check"),
            TransactionRefStatus::Unused => println!("Reference '{}' is available", reference),
            status => {
                if let Some(message) = status.message() {
                    println!("{}", message);
                }
            }
        }
        Ok(())
    }

    pub async fn preview(&self, admission_id: &str, draft: &Path) -> anyhow::Result<()> {
        let entry = self.open_entry(admission_id, draft, None).await?;
        let allocation = entry.preview()?;
        println!("{}", allocation.describe());
        println!("{}", serde_json::to_string_pretty(&allocation)?);
        Ok(())
    }

    pub async fn submit(
        &self,
        admission_id: &str,
        draft: &Path,
        attachment: Option<&Path>,
    ) -> anyhow::Result<()> {
        let mut entry = self.open_entry(admission_id, draft, attachment).await?;

        if let Some(message) = entry.check_transaction_ref().await?.message() {
            bail!(message);
        }
        println!("{}", entry.preview()?.describe());

        entry.submit().await?;
        tracing::info!(
            "Recorded payment for admission {}",
            entry.admission().admission_no
        );
        if entry.is_stale() {
            tracing::warn!("Payment saved; reloading the admission failed, retrying once");
            if let Err(e) = entry.refresh().await {
                println!("Payment saved. Run `details {}` to see updated totals ({})", admission_id, e);
                return Ok(());
            }
        }
        print_details(entry.details());
        Ok(())
    }

    pub async fn recalculate(&self, admission_id: &str) -> anyhow::Result<()> {
        let details = self.admissions.recalculate_admission(admission_id).await?;
        print_details(&details);
        Ok(())
    }

    async fn open_entry(
        &self,
        admission_id: &str,
        draft: &Path,
        attachment: Option<&Path>,
    ) -> anyhow::Result<PaymentEntry> {
        let today = chrono::Local::now().date_naive();
        let text = std::fs::read_to_string(draft)
            .with_context(|| format!("Failed to read draft {}", draft.display()))?;
        let draft = parse_draft(&text, today)?;

        let mut entry = PaymentEntry::open(self.payments.clone(), admission_id, today).await?;
        fill_entry(&mut entry, draft);
        if let Some(path) = attachment {
            entry.set_attachment(Some(read_attachment(path)?));
        }
        Ok(entry)
    }
}

/// Parses a draft file, dating it `today` when it carries no payment date.
fn parse_draft(text: &str, today: NaiveDate) -> anyhow::Result<PaymentDraft> {
    let mut value: Value = serde_json::from_str(text).context("Draft is not valid JSON")?;
    let Some(fields) = value.as_object_mut() else {
        bail!("Draft must be a JSON object");
    };
    fields
        .entry("paymentDate")
        .or_insert_with(|| Value::String(today.to_string()));
    serde_json::from_value(value).context("Draft does not match the payment form")
}

/// Replays a draft through the form so its clamping and reset rules apply.
fn fill_entry(entry: &mut PaymentEntry, draft: PaymentDraft) {
    let choices = draft.choices;

    entry.set_payer_type(draft.payer_type);
    entry.set_receiver_type(draft.receiver_type);
    entry.set_payment_date(draft.payment_date);
    entry.set_amount(draft.amount);
    entry.set_payment_mode(draft.payment_mode);
    entry.set_transaction_ref(draft.transaction_ref);
    entry.set_notes(draft.notes);

    entry.select_service_charge_option(choices.service_charge_option);
    if choices.service_charge_option == ServiceChargeOption::PartialSc {
        entry.set_requested_deduction(choices.requested_deduction);
    }
    entry.set_college_service_charge(choices.college_service_charge);
    entry.select_collecting_agent(choices.collecting_agent_id);
    entry.set_deduct_agent_fee(choices.deduct_agent_fee);
    if choices.deduct_agent_fee {
        entry.set_agent_fee_deducted(choices.agent_fee_deducted);
    }
    entry.select_fee_payee(choices.agent_id_for_fee_payment);
}

fn read_attachment(path: &Path) -> anyhow::Result<Attachment> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read attachment {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Attachment::new(file_name, bytes)?)
}

fn print_details(details: &AdmissionDetails) {
    let admission = &details.admission;
    println!("{}  {}", admission.admission_no, admission.student_name());
    if let Some(sc) = &admission.service_charge {
        println!(
            "Service charge: agreed {}, received {}, due {}",
            format_currency(sc.agreed),
            format_currency(sc.received),
            format_currency(admission.service_charge_due())
        );
    }
    println!(
        "Student due: {}, balance due to college: {}",
        format_optional_currency(admission.payment_summary.as_ref().map(|p| p.student_due)),
        format_optional_currency(
            admission
                .college_payment
                .as_ref()
                .map(|c| c.balance_due_to_college)
        )
    );
    for agent in admission.roster() {
        println!(
            "  {:<13} {:<24} fee {} paid {} due {}",
            agent.agent_type.label(),
            agent.name,
            format_currency(agent.agent_fee),
            format_currency(agent.paid),
            format_currency(agent.fee_due)
        );
    }
    println!(
        "{} payments, {} agent payments",
        details.payments.len(),
        details.agent_payments.len()
    );
}
