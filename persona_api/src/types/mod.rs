mod meta;
pub use self::meta::PaginatedResponse;

mod persona;
pub use self::persona::{PersonaID, PersonaPayload, PersonaRecord};
