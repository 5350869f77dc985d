//! Plain-text tables for the terminal.

use chrono::NaiveDate;
use dental_records_core::format::{
    display_age, format_currency, format_date, format_phone, NOT_AVAILABLE,
};
use dental_records_core::db::CollectionSummary;
use dental_records_core::{
    Notice, NoticeLevel, Patient, PatientStats, Presenter, Visit, VisitStats,
};

/// Presenter that prints the last rendered view once the command is done.
///
/// Notices go to stderr as they arrive. Error notices are skipped: the
/// command returns the same error and `main` reports it.
pub struct Table {
    today: NaiveDate,
    currency_symbol: String,
    output: Option<String>,
}

impl Table {
    pub fn new(today: NaiveDate, currency_symbol: &str) -> Self {
        Self {
            today,
            currency_symbol: currency_symbol.to_string(),
            output: None,
        }
    }

    /// Print whatever was rendered last.
    pub fn finish(self) {
        if let Some(output) = self.output {
            print!("{}", output);
        }
    }

    fn print_notice(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success | NoticeLevel::Warning => eprintln!("{}", notice),
            NoticeLevel::Error => {}
        }
    }
}

fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_AVAILABLE)
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(3)).collect();
        cut.push_str("...");
        cut
    }
}

pub fn patient_stats(stats: &PatientStats, currency_symbol: &str) -> String {
    format!(
        "Total patients:        {}\n\
         Active patients:       {}\n\
         Today's appointments:  {}\n\
         Pending appointments:  {}\n\
         Monthly revenue:       {}",
        stats.total_patients,
        stats.active_patients,
        stats.today_appointments,
        stats.pending_appointments,
        format_currency(stats.monthly_revenue, currency_symbol),
    )
}

pub fn visit_stats(stats: &VisitStats, currency_symbol: &str) -> String {
    format!(
        "Total visits:          {}\n\
         Today's visits:        {}\n\
         Cash visits:           {}\n\
         Insurance visits:      {}\n\
         Total revenue:         {}\n\
         Total discounts:       {}",
        stats.total_visits,
        stats.today_visits,
        stats.cash_patients,
        stats.insurance_patients,
        format_currency(stats.total_revenue, currency_symbol),
        format_currency(stats.total_discounts, currency_symbol),
    )
}

pub fn collections(summaries: &[CollectionSummary]) -> String {
    let mut out = format!("{:<24}  {:>7}  {:<19}\n", "KEY", "RECORDS", "UPDATED");
    for s in summaries {
        out.push_str(&format!(
            "{:<24}  {:>7}  {:<19}\n",
            truncate(&s.key, 24),
            s.record_count,
            s.updated_at
        ));
    }
    out
}

impl Presenter<Patient> for Table {
    fn render(&mut self, view: &[Patient], stats: &PatientStats) {
        let mut out = format!(
            "{:<36}  {:<24}  {:>3}  {:<16}  {:<8}  {:<12}  {:<12}\n",
            "ID", "NAME", "AGE", "PHONE", "STATUS", "LAST VISIT", "NEXT APPT"
        );
        for p in view {
            out.push_str(&format!(
                "{:<36}  {:<24}  {:>3}  {:<16}  {:<8}  {:<12}  {:<12}\n",
                p.id,
                truncate(&p.full_name(), 24),
                display_age(p.date_of_birth, self.today),
                format_phone(&p.phone),
                p.status.label(),
                format_date(p.last_visit),
                format_date(p.next_appointment),
            ));
        }
        if view.is_empty() {
            out.push_str("No patients found.\n");
        }
        out.push_str(&format!(
            "\n{} shown of {} ({} active)\n",
            view.len(),
            stats.total_patients,
            stats.active_patients
        ));
        self.output = Some(out);
    }

    fn show_detail(&mut self, p: &Patient) {
        self.output = Some(format!(
            "{}\n\
             ID:                 {}\n\
             Status:             {}\n\
             Date of birth:      {} (age {})\n\
             Phone:              {}\n\
             Email:              {}\n\
             Address:            {}\n\
             Insurance:          {} {}\n\
             Medical history:    {}\n\
             Last visit:         {}\n\
             Next appointment:   {}\n\
             Registered:         {}\n",
            p.full_name(),
            p.id,
            p.status.label(),
            format_date(p.date_of_birth),
            display_age(p.date_of_birth, self.today),
            format_phone(&p.phone),
            or_na(p.email.as_deref()),
            or_na(p.address.as_deref()),
            or_na(p.insurance_provider.as_deref()),
            p.insurance_number.as_deref().unwrap_or_default(),
            or_na(p.medical_history.as_deref()),
            format_date(p.last_visit),
            format_date(p.next_appointment),
            format_date(Some(p.created_at.date_naive())),
        ));
    }

    fn notify(&mut self, notice: Notice) {
        self.print_notice(notice);
    }
}

impl Presenter<Visit> for Table {
    fn render(&mut self, view: &[Visit], stats: &VisitStats) {
        let mut out = format!(
            "{:<36}  {:<12}  {:<20}  {:<8}  {:<9}  {:<28}  {:>12}\n",
            "ID", "DATE", "PATIENT", "FILE", "TYPE", "PROCEDURE", "FINAL"
        );
        for v in view {
            out.push_str(&format!(
                "{:<36}  {:<12}  {:<20}  {:<8}  {:<9}  {:<28}  {:>12}\n",
                v.id,
                format_date(Some(v.visit_date)),
                truncate(&v.patient_name, 20),
                truncate(&v.file_number, 8),
                v.patient_type.label(),
                truncate(&v.procedure, 28),
                format_currency(v.final_price, &self.currency_symbol),
            ));
        }
        if view.is_empty() {
            out.push_str("No visits found.\n");
        }
        out.push_str(&format!(
            "\n{} shown of {} (revenue {})\n",
            view.len(),
            stats.total_visits,
            format_currency(stats.total_revenue, &self.currency_symbol)
        ));
        self.output = Some(out);
    }

    fn show_detail(&mut self, v: &Visit) {
        self.output = Some(format!(
            "{} ({})\n\
             ID:           {}\n\
             Date:         {}\n\
             Type:         {}\n\
             Procedure:    {}\n\
             Price:        {}\n\
             Discount:     {}\n\
             Final price:  {}\n\
             Notes:        {}\n",
            v.patient_name,
            v.file_number,
            v.id,
            format_date(Some(v.visit_date)),
            v.patient_type.label(),
            v.procedure,
            format_currency(v.price, &self.currency_symbol),
            format_currency(v.discount, &self.currency_symbol),
            format_currency(v.final_price, &self.currency_symbol),
            or_na(v.notes.as_deref()),
        ));
    }

    fn notify(&mut self, notice: Notice) {
        self.print_notice(notice);
    }
}
