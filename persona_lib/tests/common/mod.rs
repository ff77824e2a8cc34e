#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use persona_lib::{DetailState, DialogHost, Person, PersonForm, PersonFormView};
use serde_json::{json, Value};

/// Dialog host that replays scripted answers and records what it was shown.
/// Runs out of form answers by cancelling.
#[derive(Default)]
pub struct ScriptedHost {
    forms: Mutex<VecDeque<PersonForm>>,
    confirmations: Mutex<VecDeque<bool>>,
    pub views: Mutex<Vec<PersonFormView>>,
    pub details: Mutex<Vec<DetailState>>,
    pub errors: Mutex<Vec<String>>,
    pub confirm_prompts: AtomicUsize,
    pub dismissals: AtomicUsize,
}

impl ScriptedHost {
    pub fn with_forms(forms: Vec<PersonForm>) -> Self {
        let host = Self::default();
        *host.forms.lock().unwrap() = forms.into();
        host
    }

    pub fn with_confirmation(answer: bool) -> Self {
        let host = Self::default();
        host.confirmations.lock().unwrap().push_back(answer);
        host
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn views(&self) -> Vec<PersonFormView> {
        self.views.lock().unwrap().clone()
    }

    pub fn details(&self) -> Vec<DetailState> {
        self.details.lock().unwrap().clone()
    }
}

#[async_trait]
impl DialogHost for ScriptedHost {
    async fn prompt_person_form(&self, view: &PersonFormView) -> Option<PersonForm> {
        self.views.lock().unwrap().push(view.clone());
        self.forms.lock().unwrap().pop_front()
    }

    async fn confirm_delete(&self, _person: &Person) -> bool {
        self.confirm_prompts.fetch_add(1, Ordering::SeqCst);
        self.confirmations.lock().unwrap().pop_front().unwrap_or(false)
    }

    async fn render_detail(&self, state: &DetailState) {
        self.details.lock().unwrap().push(state.clone());
    }

    async fn await_dismiss(&self) {
        self.dismissals.fetch_add(1, Ordering::SeqCst);
    }

    async fn show_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

pub fn wire_record(id: i64, deleted: bool) -> Value {
    json!({
        "id": id,
        "nombre": format!("Persona {}", id),
        "edad": 20 + (id % 50),
        "email": format!("persona{}@example.com", id),
        "eliminado": deleted
    })
}

/// Envelope for `page` of `size` over `total` records, ids numbered from 1.
pub fn envelope(total: i64, page: i64, size: i64, deleted: &[i64]) -> Value {
    let first = (page - 1) * size + 1;
    let last = (page * size).min(total);
    let data: Vec<Value> = (first..=last)
        .map(|id| wire_record(id, deleted.contains(&id)))
        .collect();
    json!({
        "totalRecords": total,
        "page": page,
        "pageSize": size,
        "totalPages": (total + size - 1) / size,
        "data": data
    })
}

pub fn person(id: i64) -> Person {
    Person {
        id,
        name: format!("Persona {}", id),
        age: 20 + (id % 50),
        email: format!("persona{}@example.com", id),
    }
}
