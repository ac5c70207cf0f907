//! Dynamic matrix: a question whose answer is an array of row objects and whose row count can
//! grow and shrink.
//!
//! Each generated row carries a stamp from a per-question counter that never repeats, so a row
//! keeps its identity while rows before it are removed. A row's value is always looked up by
//! its position in the generated list, not by its stamp.

use serde_json::{Map, Value};
use survey_expr::is_value_empty;
use tracing::trace;

use crate::{
    ErrorKind, Localization, Property, Question, QuestionEvent, QuestionHooks, SurveyError,
    format_string,
};

/// Upper bound for the row count.
pub const MAX_ROW_COUNT: usize = 100;

/// Row count of a freshly created matrix.
const DEFAULT_ROW_COUNT: usize = 2;

/// One generated row of a dynamic matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixRowModel {
    /// Stamp assigned at creation.
    index: u64,
    /// The row's slice of the matrix answer.
    value: Value,
}

impl MatrixRowModel {
    /// Stamp assigned at creation.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Name used for the row in rendered output.
    pub fn row_name(&self) -> String {
        format!("row{}", self.index)
    }

    /// The row's slice of the matrix answer.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Whether the row holds no answer.
    pub fn is_empty(&self) -> bool {
        is_value_empty(&self.value)
    }
}

/// `value` as exactly `row_count` row entries: truncated, then padded with empty objects.
pub fn normalized_value(value: &Value, row_count: usize) -> Vec<Value> {
    let mut rows = match value {
        Value::Array(items) => items.clone(),
        _ => Vec::new(),
    };
    rows.truncate(row_count);
    rows.resize(row_count, Value::Object(Map::new()));
    rows
}

/// Rows as a matrix answer; an array with nothing but empty rows becomes null.
fn collapse_empty(rows: Vec<Value>) -> Value {
    if rows.iter().all(is_value_empty) {
        Value::Null
    } else {
        Value::Array(rows)
    }
}

/// Row engine of a [`DynamicMatrixQuestion`].
#[derive(Debug, Clone)]
pub struct DynamicRows {
    /// Number of rows.
    row_count: usize,
    /// Rows that must hold an answer once rows are generated.
    min_row_count: usize,
    /// Next row stamp.
    row_counter: u64,
    /// Rows handed out by the last `visible_rows` call.
    generated: Option<Vec<MatrixRowModel>>,
    /// Set while a row edit is being written back into the answer.
    row_changing: bool,
    /// Label of the add button.
    add_row_text: Option<String>,
    /// Label of the remove button.
    remove_row_text: Option<String>,
}

impl Default for DynamicRows {
    fn default() -> Self {
        Self {
            row_count: DEFAULT_ROW_COUNT,
            min_row_count: 0,
            row_counter: 0,
            generated: None,
            row_changing: false,
            add_row_text: None,
            remove_row_text: None,
        }
    }
}

impl DynamicRows {
    /// A row holding `value`, stamped with the next counter value.
    fn create_row(&mut self, value: Value) -> MatrixRowModel {
        let index = self.row_counter;
        self.row_counter += 1;
        MatrixRowModel { index, value }
    }

    /// Position of the row stamped `index` in the generated rows.
    fn position(&self, index: u64) -> Option<usize> {
        self.generated
            .as_ref()?
            .iter()
            .position(|row| row.index == index)
    }
}

impl QuestionHooks for DynamicRows {
    fn on_value_changed(&mut self, value: &Value) {
        if self.row_changing {
            return;
        }
        let row_count = self.row_count;
        if let Some(rows) = &mut self.generated {
            for (row, value) in rows.iter_mut().zip(normalized_value(value, row_count)) {
                row.value = value;
            }
        }
    }

    fn check_for_errors(
        &self,
        value: &Value,
        errors: &mut Vec<SurveyError>,
        strings: &dyn Localization,
    ) {
        if self.min_row_count == 0 || self.generated.is_none() {
            return;
        }
        let filled = normalized_value(value, self.row_count)
            .iter()
            .filter(|row| !is_value_empty(row))
            .count();
        if filled < self.min_row_count {
            let text = format_string(
                &strings.get_string("minRowCountError"),
                &[self.min_row_count.to_string()],
            );
            errors.push(SurveyError::new(ErrorKind::Custom, text));
        }
    }

    fn supports_comment(&self) -> bool {
        false
    }
}

/// A matrix question whose rows are added and removed by the respondent.
pub type DynamicMatrixQuestion = Question<DynamicRows>;

#[allow(clippy::multiple_inherent_impl)]
impl Question<DynamicRows> {
    /// A dynamic matrix called `name` with the default row count.
    pub fn matrix(name: impl Into<String>) -> Self {
        Self::with_hooks(name, DynamicRows::default())
    }

    /// Set the initial row count; out-of-range counts are ignored.
    pub fn with_row_count(mut self, count: i64) -> Self {
        self.set_row_count(count);
        self
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.hooks.row_count
    }

    /// Change the row count. Counts outside `0..=MAX_ROW_COUNT` are ignored and return `false`.
    ///
    /// Generated rows are kept in step: surplus rows are dropped, missing rows are created with
    /// fresh stamps. The answer itself is not truncated.
    pub fn set_row_count(&mut self, count: i64) -> bool {
        match usize::try_from(count) {
            Ok(count) if count <= MAX_ROW_COUNT => {
                self.resize_rows(count);
                true
            }
            _ => {
                trace!(question = %self.name(), count, "row_count_rejected");
                false
            }
        }
    }

    /// Apply an accepted row count.
    fn resize_rows(&mut self, count: usize) {
        if let Some(mut rows) = self.hooks.generated.take() {
            rows.truncate(count);
            let existing = rows.len();
            for value in normalized_value(&self.value(), count)
                .into_iter()
                .skip(existing)
            {
                rows.push(self.hooks.create_row(value));
            }
            self.hooks.generated = Some(rows);
        }
        self.hooks.row_count = count;
        self.fire(QuestionEvent::PropertyChanged(Property::RowCount));
    }

    /// Rows that must be filled in once rows are generated.
    pub fn min_row_count(&self) -> usize {
        self.hooks.min_row_count
    }

    /// Change the minimum, clamped to `MAX_ROW_COUNT`; raises the row count to match.
    pub fn set_min_row_count(&mut self, count: usize) {
        let count = count.min(MAX_ROW_COUNT);
        self.hooks.min_row_count = count;
        if self.hooks.row_count < count {
            self.resize_rows(count);
        }
    }

    /// Append a row. Does nothing at `MAX_ROW_COUNT`.
    pub fn add_row(&mut self) {
        let count = self.hooks.row_count;
        if count >= MAX_ROW_COUNT {
            return;
        }
        self.resize_rows(count + 1);
    }

    /// Remove the row at `index`. Out-of-range indices are ignored.
    ///
    /// The matching answer entry is removed too; if only empty rows remain the answer becomes
    /// null.
    pub fn remove_row(&mut self, index: usize) {
        let count = self.hooks.row_count;
        if index >= count {
            return;
        }
        if let Some(rows) = &mut self.hooks.generated
            && index < rows.len()
        {
            rows.remove(index);
        }
        let value = self.value();
        if !value.is_null() {
            let mut rows = normalized_value(&value, count);
            rows.remove(index);
            self.write_rows(rows);
        }
        self.hooks.row_count = count - 1;
        self.fire(QuestionEvent::PropertyChanged(Property::RowCount));
    }

    /// Build `row_count` fresh rows from the current answer. Every call stamps new rows.
    pub fn generate_rows(&mut self) -> Vec<MatrixRowModel> {
        let count = self.hooks.row_count;
        if count == 0 {
            return Vec::new();
        }
        normalized_value(&self.value(), count)
            .into_iter()
            .map(|value| self.hooks.create_row(value))
            .collect()
    }

    /// Regenerate the rows and keep them for later row edits.
    pub fn visible_rows(&mut self) -> &[MatrixRowModel] {
        let rows = self.generate_rows();
        self.hooks.generated.insert(rows).as_slice()
    }

    /// Rows from the last [`visible_rows`](Self::visible_rows) call.
    pub fn cached_rows(&self) -> Option<&[MatrixRowModel]> {
        self.hooks.generated.as_deref()
    }

    /// Answer of `row`, by its position among the generated rows; null for unknown rows.
    pub fn row_value(&self, row: &MatrixRowModel) -> Value {
        let Some(position) = self.hooks.position(row.index) else {
            return Value::Null;
        };
        normalized_value(&self.value(), self.hooks.row_count)
            .into_iter()
            .nth(position)
            .unwrap_or(Value::Null)
    }

    /// Write the answer of one generated row and notify. Returns `false` for unknown rows.
    pub fn set_row_value(&mut self, row: &MatrixRowModel, value: Value) -> bool {
        let Some(position) = self.hooks.position(row.index) else {
            return false;
        };
        let mut rows = normalized_value(&self.value(), self.hooks.row_count);
        let Some(slot) = rows.get_mut(position) else {
            return false;
        };
        *slot = value.clone();
        if let Some(cached) = self
            .hooks
            .generated
            .as_mut()
            .and_then(|generated| generated.get_mut(position))
        {
            cached.value = value;
        }
        self.write_rows(rows);
        true
    }

    /// Store `rows` as the answer without refreshing the generated rows from it.
    fn write_rows(&mut self, rows: Vec<Value>) {
        self.hooks.row_changing = true;
        self.set_value(collapse_empty(rows));
        self.hooks.row_changing = false;
    }

    /// Label of the add button.
    pub fn add_row_text(&self) -> String {
        self.hooks
            .add_row_text
            .clone()
            .unwrap_or_else(|| self.localization().get_string("addRow"))
    }

    /// Replace the label of the add button.
    pub fn set_add_row_text(&mut self, text: impl Into<String>) {
        self.hooks.add_row_text = Some(text.into());
    }

    /// Label of the remove button.
    pub fn remove_row_text(&self) -> String {
        self.hooks
            .remove_row_text
            .clone()
            .unwrap_or_else(|| self.localization().get_string("removeRow"))
    }

    /// Replace the label of the remove button.
    pub fn set_remove_row_text(&mut self, text: impl Into<String>) {
        self.hooks.remove_row_text = Some(text.into());
    }
}
