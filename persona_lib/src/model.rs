//! Domain shapes: [`Person`], [`PersonDraft`], [`Page`] and the sort order
//! tracked by the list controller.

use std::cmp::Ordering;
use std::str::FromStr;

use persona_api::types::{PaginatedResponse, PersonaID, PersonaPayload, PersonaRecord};
use serde::Serialize;

/// Page size used before the user picks one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A person as the UI sees it. The wire-level soft-delete flag is gone;
/// deleted records never become a `Person`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub id: PersonaID,
    pub name: String,
    pub age: i64,
    pub email: String,
}

impl Person {
    /// Maps a wire record, dropping it when it is soft-deleted.
    pub fn from_record(record: PersonaRecord) -> Option<Self> {
        if record.eliminado {
            return None;
        }
        Some(Self {
            id: record.id,
            name: record.nombre,
            age: record.edad,
            email: record.email,
        })
    }

    /// Builds the record the server stored when it acknowledges an update
    /// without echoing it back.
    pub fn from_draft(id: PersonaID, draft: &PersonDraft) -> Self {
        Self {
            id,
            name: draft.name.clone(),
            age: draft.age,
            email: draft.email.clone(),
        }
    }
}

/// Validated create/update body.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PersonDraft {
    pub name: String,
    pub age: i64,
    pub email: String,
}

impl From<&PersonDraft> for PersonaPayload {
    fn from(draft: &PersonDraft) -> Self {
        PersonaPayload {
            nombre: draft.name.clone(),
            edad: draft.age,
            email: draft.email.clone(),
        }
    }
}

/// One server-paginated slice of the directory plus its metadata.
///
/// `total_pages` always equals `ceil(total_records / page_size)` and
/// `records.len()` never exceeds `page_size`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub records: Vec<Person>,
    pub total_records: usize,
    /// 1-based page number.
    pub current_page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self::empty(1, DEFAULT_PAGE_SIZE)
    }
}

impl Page {
    /// A page with no rows, used before the first load and as the fallback
    /// when a page fetch fails.
    pub fn empty(current_page: usize, page_size: usize) -> Self {
        Self {
            records: Vec::new(),
            total_records: 0,
            current_page: current_page.max(1),
            page_size: page_size.max(1),
            total_pages: 0,
        }
    }

    /// Normalises a paged envelope for a request of `page_size` rows.
    ///
    /// Soft-deleted rows are dropped, `total_pages` is recomputed from the
    /// record count and rows beyond `page_size` are cut off.
    pub fn from_envelope(resp: PaginatedResponse<PersonaRecord>, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total_records = to_count(resp.total_records);
        let total_pages = total_pages_for(total_records, page_size);

        if resp.page_size > 0 && to_count(resp.page_size) != page_size {
            tracing::warn!(
                "Server answered with page size {} for a request of {}",
                resp.page_size,
                page_size
            );
        }
        if to_count(resp.total_pages) != total_pages {
            tracing::warn!(
                "Server reported {} total pages, expected {} for {} records",
                resp.total_pages,
                total_pages,
                total_records
            );
        }

        let received = resp.data.len();
        let mut records: Vec<Person> = resp
            .data
            .into_iter()
            .filter_map(Person::from_record)
            .collect();
        if records.len() > page_size {
            tracing::warn!(
                "Server sent {} rows for a page of {}, truncating",
                records.len(),
                page_size
            );
            records.truncate(page_size);
        }
        let dropped = received - records.len();
        if dropped > 0 {
            tracing::debug!("Dropped {} soft-deleted or excess rows", dropped);
        }

        Self {
            records,
            total_records,
            current_page: to_count(resp.page).max(1),
            page_size,
            total_pages,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 0-based index of this page.
    pub fn page_index(&self) -> usize {
        self.current_page.saturating_sub(1)
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// The rows of this page ordered for display.
    pub fn sorted_records(&self, order: Option<SortOrder>) -> Vec<Person> {
        let mut rows = self.records.clone();
        if let Some(order) = order {
            order.sort(&mut rows);
        }
        rows
    }
}

/// `ceil(total_records / page_size)`; zero records means zero pages.
pub fn total_pages_for(total_records: usize, page_size: usize) -> usize {
    total_records.div_ceil(page_size.max(1))
}

fn to_count(value: i64) -> usize {
    usize::try_from(value).unwrap_or(0)
}

/// Column the list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Id,
    Name,
    Age,
    Email,
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "id" => Ok(SortColumn::Id),
            "name" => Ok(SortColumn::Name),
            "age" => Ok(SortColumn::Age),
            "email" => Ok(SortColumn::Email),
            other => Err(format!(
                "unknown sort column '{}'. Valid values: id, name, age, email",
                other
            )),
        }
    }
}

impl std::fmt::Display for SortColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SortColumn::Id => "id",
                SortColumn::Name => "name",
                SortColumn::Age => "age",
                SortColumn::Email => "email",
            }
        )
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction '{}'. Valid values: asc, desc", other)),
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    pub fn sort(&self, people: &mut [Person]) {
        people.sort_by(|a, b| self.compare(a, b));
    }

    fn compare(&self, a: &Person, b: &Person) -> Ordering {
        let ord = match self.column {
            SortColumn::Id => a.id.cmp(&b.id),
            SortColumn::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortColumn::Age => a.age.cmp(&b.age),
            SortColumn::Email => a.email.to_lowercase().cmp(&b.email.to_lowercase()),
        };
        // Ties keep a stable order by id.
        let ord = ord.then_with(|| a.id.cmp(&b.id));
        match self.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, deleted: bool) -> PersonaRecord {
        PersonaRecord {
            id,
            nombre: format!("Person {}", id),
            edad: 20 + id,
            email: format!("p{}@example.com", id),
            eliminado: deleted,
        }
    }

    fn envelope(total: i64, page: i64, size: i64, pages: i64, data: Vec<PersonaRecord>) -> PaginatedResponse<PersonaRecord> {
        PaginatedResponse {
            total_records: total,
            page,
            page_size: size,
            total_pages: pages,
            data,
        }
    }

    #[test]
    fn soft_deleted_record_is_dropped() {
        assert!(Person::from_record(record(1, true)).is_none());
        let person = Person::from_record(record(2, false)).unwrap();
        assert_eq!(person.name, "Person 2");
        assert_eq!(person.age, 22);
    }

    #[test]
    fn envelope_with_one_deleted_row() {
        let data = (1..=10).map(|id| record(id, id == 4)).collect();
        let page = Page::from_envelope(envelope(25, 1, 10, 3, data), 10);
        assert_eq!(page.records.len(), 9);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_records, 25);
        assert_eq!(page.current_page, 1);
        assert!(page.records.iter().all(|p| p.id != 4));
    }

    #[test]
    fn total_pages_recomputed_when_server_disagrees() {
        let page = Page::from_envelope(envelope(21, 2, 10, 99, vec![record(11, false)]), 10);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn excess_rows_are_truncated() {
        let data = (1..=7).map(|id| record(id, false)).collect();
        let page = Page::from_envelope(envelope(7, 1, 5, 2, data), 5);
        assert_eq!(page.records.len(), 5);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn negative_counts_become_zero() {
        let page = Page::from_envelope(envelope(-1, 0, 10, -1, vec![]), 10);
        assert_eq!(page.total_records, 0);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.current_page, 1);
    }

    #[test]
    fn total_pages_formula() {
        assert_eq!(total_pages_for(0, 10), 0);
        assert_eq!(total_pages_for(1, 10), 1);
        assert_eq!(total_pages_for(10, 10), 1);
        assert_eq!(total_pages_for(11, 10), 2);
        assert_eq!(total_pages_for(25, 1), 25);
    }

    #[test]
    fn default_page_is_empty_with_ten_rows() {
        let page = Page::default();
        assert!(page.is_empty());
        assert_eq!(page.page_size, DEFAULT_PAGE_SIZE);
        assert!(!page.has_next());
        assert!(!page.has_previous());
    }

    #[test]
    fn navigation_flags() {
        let data = (11..=20).map(|id| record(id, false)).collect();
        let page = Page::from_envelope(envelope(25, 2, 10, 3, data), 10);
        assert_eq!(page.page_index(), 1);
        assert!(page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn sorted_records_by_name_desc() {
        let mut page = Page::empty(1, 10);
        page.records = vec![
            Person { id: 1, name: "bruno".into(), age: 30, email: "b@x.io".into() },
            Person { id: 2, name: "Ana".into(), age: 40, email: "a@x.io".into() },
            Person { id: 3, name: "carla".into(), age: 20, email: "c@x.io".into() },
        ];
        let order = SortOrder::new(SortColumn::Name, SortDirection::Desc);
        let ids: Vec<_> = page.sorted_records(Some(order)).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);

        let order = SortOrder::new(SortColumn::Age, SortDirection::Asc);
        let ids: Vec<_> = page.sorted_records(Some(order)).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);

        let ids: Vec<_> = page.sorted_records(None).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn parse_sort_column_and_direction() {
        assert_eq!("Name".parse::<SortColumn>().unwrap(), SortColumn::Name);
        assert!("salary".parse::<SortColumn>().is_err());
        assert_eq!("DESC".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert!("up".parse::<SortDirection>().is_err());
    }

    #[test]
    fn draft_to_wire_payload() {
        let draft = PersonDraft { name: "Ana".into(), age: 34, email: "ana@x.io".into() };
        let payload = PersonaPayload::from(&draft);
        assert_eq!(payload.nombre, "Ana");
        assert_eq!(payload.edad, 34);
    }
}
