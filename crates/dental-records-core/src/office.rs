//! The dental office: both record books, their store, and intent dispatch.
//!
//! Every intent runs to completion before the next one is handled. After a
//! mutation the collection is saved, the view is rebuilt with the active
//! search/filter/sort, and the presenter gets the new view and stats.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::config::OfficeConfig;
use crate::db::CollectionStore;
use crate::error::CoreResult;
use crate::export::{parse_import, CollectionExport};
use crate::models::{Patient, Visit};
use crate::presenter::{Intent, Notice, Presenter};
use crate::records::{Applied, Managed, RecordBook};
use crate::seed;
use crate::stats::{PatientStats, StatsContext, Summarize, VisitStats};

/// Owned application state, constructed once at startup.
pub struct DentalOffice<S: CollectionStore> {
    config: OfficeConfig,
    store: S,
    patients: RecordBook<Patient>,
    visits: RecordBook<Visit>,
    /// Fixed "today" for stats; the local date when unset
    today: Option<NaiveDate>,
}

impl<S: CollectionStore> DentalOffice<S> {
    /// Load both collections, seeding any that come back empty.
    ///
    /// A load failure is returned; a failed save of seed data is only logged,
    /// the seed records stay in memory.
    pub fn open(config: OfficeConfig, store: S) -> CoreResult<Self> {
        let mut patients = RecordBook::new(config.patients_key());
        let mut visits = RecordBook::new(config.visits_key());

        let patient_count = patients.load(&store)?;
        let visit_count = visits.load(&store)?;
        info!(patients = patient_count, visits = visit_count, "collections loaded");

        if config.seed_on_first_run() {
            seed_if_empty(&mut patients, &store, seed::patients);
            seed_if_empty(&mut visits, &store, seed::visits);
        }

        Ok(Self {
            config,
            store,
            patients,
            visits,
            today: None,
        })
    }

    pub fn config(&self) -> &OfficeConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn patients(&self) -> &RecordBook<Patient> {
        &self.patients
    }

    pub fn visits(&self) -> &RecordBook<Visit> {
        &self.visits
    }

    /// Pin the date used for "today" in stats.
    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = Some(today);
    }

    /// Date used for "today".
    pub fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    fn stats_context(&self) -> StatsContext {
        StatsContext {
            today: self.today(),
            revenue_per_patient: self.config.revenue_per_patient(),
        }
    }

    pub fn patient_stats(&self) -> PatientStats {
        Patient::summarize(self.patients.all(), &self.stats_context())
    }

    pub fn visit_stats(&self) -> VisitStats {
        Visit::summarize(self.visits.all(), &self.stats_context())
    }

    /// Handle a patient registry intent.
    pub fn dispatch_patients<P: Presenter<Patient>>(
        &mut self,
        intent: Intent<Patient>,
        presenter: &mut P,
    ) -> CoreResult<()> {
        let ctx = self.stats_context();
        dispatch(&mut self.patients, &self.store, &ctx, intent, presenter)
    }

    /// Handle a visit ledger intent.
    pub fn dispatch_visits<P: Presenter<Visit>>(
        &mut self,
        intent: Intent<Visit>,
        presenter: &mut P,
    ) -> CoreResult<()> {
        let ctx = self.stats_context();
        dispatch(&mut self.visits, &self.store, &ctx, intent, presenter)
    }

    /// Push the current patient view without any intent.
    pub fn render_patients<P: Presenter<Patient>>(&self, presenter: &mut P) {
        render(&self.patients, &self.stats_context(), presenter);
    }

    /// Push the current visit view without any intent.
    pub fn render_visits<P: Presenter<Visit>>(&self, presenter: &mut P) {
        render(&self.visits, &self.stats_context(), presenter);
    }

    /// Append patients parsed from `json` (see [`parse_import`]).
    pub fn import_patients(&mut self, json: &str) -> CoreResult<Applied<usize>> {
        let records = parse_import(json)?;
        Ok(self.patients.append(records, &self.store))
    }

    /// Append visits parsed from `json` (see [`parse_import`]).
    pub fn import_visits(&mut self, json: &str) -> CoreResult<Applied<usize>> {
        let records = parse_import(json)?;
        Ok(self.visits.append(records, &self.store))
    }

    pub fn export_patients(&self) -> CollectionExport<Patient> {
        CollectionExport::new(self.patients.key(), self.patients.all())
    }

    pub fn export_visits(&self) -> CollectionExport<Visit> {
        CollectionExport::new(self.visits.key(), self.visits.all())
    }

    /// Give back the store, e.g. to reopen the office on it.
    pub fn into_store(self) -> S {
        self.store
    }
}

fn seed_if_empty<R, S>(book: &mut RecordBook<R>, store: &S, records: fn() -> Vec<R>)
where
    R: Managed,
    S: CollectionStore,
{
    if !book.is_empty() {
        return;
    }
    let applied = book.append(records(), store);
    match applied.save_error {
        None => info!(key = %book.key(), count = applied.value, "seed data installed"),
        Some(e) => warn!(key = %book.key(), error = %e, "seed data installed but not persisted"),
    }
}

fn render<R, P>(book: &RecordBook<R>, ctx: &StatsContext, presenter: &mut P)
where
    R: Managed + Summarize,
    P: Presenter<R>,
{
    let stats = R::summarize(book.all(), ctx);
    presenter.render(book.view(), &stats);
}

/// Success notice, or a warning when the change did not reach the store.
fn saved_notice<T>(applied: &Applied<T>, message: String) -> Notice {
    match &applied.save_error {
        None => Notice::success(message),
        Some(e) => Notice::warning(format!("{} (not saved: {})", message, e)),
    }
}

fn dispatch<R, S, P>(
    book: &mut RecordBook<R>,
    store: &S,
    ctx: &StatsContext,
    intent: Intent<R>,
    presenter: &mut P,
) -> CoreResult<()>
where
    R: Managed + Summarize,
    S: CollectionStore,
    P: Presenter<R>,
{
    debug!(key = %book.key(), intent = intent.name(), "dispatching intent");
    let mutation = intent.is_mutation();

    let outcome = match intent {
        Intent::CreateRequested(draft) => book
            .create(draft, store)
            .map(|a| Some(saved_notice(&a, format!("{} added successfully!", R::LABEL)))),
        Intent::UpdateRequested { id, changes } => book
            .update(&id, changes, store)
            .map(|a| Some(saved_notice(&a, format!("{} updated successfully!", R::LABEL)))),
        Intent::DeleteRequested(id) => {
            // Unknown ids are a silent no-op, even when the save fails
            let applied = book.delete(&id, store);
            Ok(applied.value.then(|| {
                saved_notice(&applied, format!("{} deleted successfully!", R::LABEL))
            }))
        }
        Intent::SearchChanged(text) => {
            book.set_search(text);
            Ok(None)
        }
        Intent::FilterChanged(filter) => {
            book.set_filter(filter);
            Ok(None)
        }
        Intent::SortChanged(key) => {
            book.set_sort(key);
            Ok(None)
        }
        Intent::DetailRequested(id) => match book.get(&id) {
            Ok(record) => {
                presenter.show_detail(record);
                return Ok(());
            }
            Err(e) => Err(e),
        },
    };

    match outcome {
        Ok(notice) => {
            if mutation {
                debug!(key = %book.key(), records = book.len(), "collection changed");
            }
            render(book, ctx, presenter);
            if let Some(notice) = notice {
                presenter.notify(notice);
            }
            Ok(())
        }
        Err(e) => {
            presenter.notify(Notice::error(e.to_string()));
            Err(e)
        }
    }
}
