//! The stateful grid component.
//!
//! [`RecordGrid`] owns the configuration, the bound data source and the last
//! materialized table. Every change recomputes the whole table in one
//! synchronous pass: resolve, materialize, bind, reconcile the layout.

use std::any::Any;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, error, info, info_span, warn};

use grid_layout::{Layout, apply_layout, parse_layout, write_layout};
use grid_model::{
    ColumnDefinition, DataSource, MaterializedTable, MetadataProvider, NoMetadata, Record,
    RecordCollection,
};

use crate::diagnostics::Diagnostic;
use crate::dispatch::{OwnerHandle, OwnerQueue};
use crate::error::{DispatchError, GridError, Result};
use crate::events::{CellPosition, InteractionKind, RecordEvent};
use crate::materialize::materialize;
use crate::options::GridOptions;
use crate::resolver::ColumnResolver;
use crate::service::RecordService;
use crate::sink::GridSink;

type DiagnosticHook = Box<dyn FnMut(&Diagnostic)>;

enum Binding {
    Records(RecordCollection),
    Opaque(Arc<dyn Any + Send + Sync>),
}

pub struct RecordGrid<S: GridSink> {
    sink: S,
    options: GridOptions,
    metadata: Box<dyn MetadataProvider>,
    service: Option<Arc<dyn RecordService>>,
    declared: Vec<ColumnDefinition>,
    layout: Option<Layout>,
    binding: Option<Binding>,
    table: Option<MaterializedTable>,
    diagnostics: Vec<Diagnostic>,
    on_diagnostic: Option<DiagnosticHook>,
    queue: OwnerQueue<RecordGrid<S>>,
}

impl<S: GridSink> RecordGrid<S> {
    /// Creates a grid owned by the calling thread.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            options: GridOptions::default(),
            metadata: Box::new(NoMetadata),
            service: None,
            declared: Vec::new(),
            layout: None,
            binding: None,
            table: None,
            diagnostics: Vec::new(),
            on_diagnostic: None,
            queue: OwnerQueue::new(),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: impl MetadataProvider + 'static) -> Self {
        self.metadata = Box::new(metadata);
        self
    }

    #[must_use]
    pub fn with_service(mut self, service: Arc<dyn RecordService>) -> Self {
        self.service = Some(service);
        self
    }

    /// Registers a callback for recoverable problems (cell faults, failed refreshes and fetches).
    pub fn on_diagnostic(&mut self, hook: impl FnMut(&Diagnostic) + 'static) {
        self.on_diagnostic = Some(Box::new(hook));
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    /// The table of the last successful refresh.
    pub fn table(&self) -> Option<&MaterializedTable> {
        self.table.as_ref()
    }

    /// Diagnostics collected by the last refresh.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    /// Handle for scheduling work on this grid from other threads.
    pub fn handle(&self) -> OwnerHandle<RecordGrid<S>> {
        self.queue.handle()
    }

    pub fn set_data_source(&mut self, source: impl Into<DataSource>) {
        self.binding = Some(match source.into().into_collection() {
            Ok(collection) => Binding::Records(collection),
            Err(payload) => Binding::Opaque(payload),
        });
        self.changed();
    }

    pub fn set_options(&mut self, options: GridOptions) {
        self.options = options;
        self.changed();
    }

    /// Applies `update` to the options, then refreshes when auto-refresh is on.
    pub fn update_options(&mut self, update: impl FnOnce(&mut GridOptions)) {
        update(&mut self.options);
        self.changed();
    }

    pub fn set_filter_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.update_options(|options| options.filter_text = text);
    }

    pub fn set_friendly_names(&mut self, friendly: bool) {
        self.update_options(|options| options.show_friendly_names = friendly);
    }

    pub fn set_column_order(&mut self, order: Vec<String>) {
        self.update_options(|options| options.column_order = order);
    }

    pub fn set_declared_columns(&mut self, columns: Vec<ColumnDefinition>) {
        self.declared = columns;
        self.changed();
    }

    /// Sets the persisted layout. A malformed description clears the layout.
    pub fn set_layout_xml(&mut self, xml: &str) {
        self.layout = parse_layout(xml);
        self.changed();
    }

    pub fn clear_layout(&mut self) {
        self.layout = None;
        self.changed();
    }

    /// Current sink column state in the persisted layout format.
    pub fn export_layout(&self) -> std::result::Result<String, grid_layout::LayoutError> {
        write_layout(self.sink.columns())
    }

    fn changed(&mut self) {
        if !self.options.auto_refresh {
            return;
        }
        if let Err(err) = self.refresh() {
            error!(error = %err, "refresh failed");
            self.emit(&Diagnostic::new(err.to_string()));
        }
    }

    /// Recomputes the table and rebinds the sink.
    ///
    /// A validation error leaves the previous table and the sink untouched.
    pub fn refresh(&mut self) -> Result<()> {
        let collection = match &self.binding {
            None => {
                self.table = None;
                self.sink.clear();
                return Ok(());
            }
            Some(Binding::Opaque(payload)) => {
                debug!("binding opaque data source");
                self.table = None;
                self.sink.bind_opaque(payload.clone());
                return Ok(());
            }
            Some(Binding::Records(collection)) => collection,
        };

        let span = info_span!("refresh", entity = collection.entity_name().unwrap_or_default());
        let _guard = span.enter();

        let columns = ColumnResolver::new(&self.options, self.metadata.as_ref())
            .with_declared(&self.declared)
            .with_layout(self.layout.as_ref())
            .resolve(collection)
            .inspect_err(|err| warn!(error = %err, "refresh aborted"))?;

        let mut diagnostics = Vec::new();
        let rows = materialize(collection, &columns, &self.options, &mut |d| diagnostics.push(d));
        let table = MaterializedTable {
            entity_name: collection.entity_name().map(str::to_string),
            columns,
            rows,
        };

        self.sink.set_columns(&table.columns);
        self.sink.set_rows(table.rows.clone());
        if let Some(layout) = &self.layout {
            apply_layout(layout, self.sink.columns_mut());
        }
        info!(rows = table.rows.len(), columns = table.columns.len(), "refreshed");

        self.table = Some(table);
        for diagnostic in &diagnostics {
            self.emit(diagnostic);
        }
        self.diagnostics = diagnostics;
        Ok(())
    }

    /// Refreshes on the owning thread, after any work other threads queued.
    pub fn request_refresh(&mut self) -> Result<()> {
        self.process_pending();
        self.refresh()
    }

    /// Queues a refresh from another thread; [`Self::process_pending`] runs it.
    ///
    /// Fails with [`DispatchError::OwnerThread`] on the owning thread, where
    /// [`Self::request_refresh`] refreshes directly.
    pub fn queue_refresh(handle: &OwnerHandle<Self>) -> std::result::Result<(), DispatchError>
    where
        S: 'static,
    {
        if handle.is_owner_thread() {
            return Err(DispatchError::OwnerThread);
        }
        handle.post(|grid| {
            if let Err(err) = grid.refresh() {
                error!(error = %err, "queued refresh failed");
                grid.emit(&Diagnostic::new(err.to_string()));
            }
        })
    }

    /// Runs work other threads queued for this grid.
    pub fn process_pending(&mut self) -> usize {
        let queue = self.queue.clone();
        queue.run_pending(self)
    }

    /// Fetches records through the configured service and binds them.
    pub fn fetch(&mut self, query: &str, layout: Option<&str>) -> Result<()> {
        let service = self.service.clone().ok_or(GridError::ServiceUnavailable)?;
        let collection = service.retrieve(query, layout)?;
        self.bind_fetched(collection, layout);
        Ok(())
    }

    /// Fetches on a worker thread; the result is applied by [`Self::process_pending`].
    pub fn fetch_in_background(
        &self,
        query: impl Into<String>,
        layout: Option<String>,
    ) -> Result<JoinHandle<()>>
    where
        S: 'static,
    {
        let service = self.service.clone().ok_or(GridError::ServiceUnavailable)?;
        let handle = self.handle();
        let query = query.into();
        Ok(thread::spawn(move || {
            let result = service.retrieve(&query, layout.as_deref());
            let posted = handle.post(move |grid| match result {
                Ok(collection) => grid.bind_fetched(collection, layout.as_deref()),
                Err(err) => {
                    warn!(error = %err, "background fetch failed");
                    grid.emit(&Diagnostic::new(err.to_string()));
                }
            });
            if posted.is_err() {
                debug!("grid dropped before fetch completed");
            }
        }))
    }

    fn bind_fetched(&mut self, collection: RecordCollection, layout: Option<&str>) {
        if let Some(xml) = layout {
            self.layout = parse_layout(xml);
        }
        self.set_data_source(collection);
    }

    /// Translates a sink interaction into a record event.
    pub fn interaction(
        &self,
        kind: InteractionKind,
        position: Option<&CellPosition>,
    ) -> RecordEvent {
        let mut event = RecordEvent {
            kind,
            record: None,
            column: None,
            reference: None,
        };
        let Some(position) = position else {
            return event;
        };
        let Some(record) = self.record_at(position.row) else {
            return event;
        };
        if self.options.entity_reference_clickable {
            event.reference = record
                .get(&position.column)
                .and_then(|value| value.unaliased().as_reference())
                .cloned();
        }
        event.column = Some(position.column.clone());
        event.record = Some(record);
        event
    }

    /// Distinct records behind the selected cells, in selection order.
    pub fn selected_records(&self, cells: &[CellPosition]) -> Vec<Arc<Record>> {
        let mut seen = HashSet::new();
        cells
            .iter()
            .filter_map(|cell| self.record_at(cell.row))
            .filter(|record| seen.insert(Arc::as_ptr(record)))
            .collect()
    }

    fn record_at(&self, row: usize) -> Option<Arc<Record>> {
        self.table
            .as_ref()
            .and_then(|table| table.rows.get(row))
            .and_then(|row| row.record())
            .cloned()
    }

    fn emit(&mut self, diagnostic: &Diagnostic) {
        if let Some(hook) = self.on_diagnostic.as_mut() {
            hook(diagnostic);
        }
    }
}
