//! Domain model (ids, campaign record, status/category, validation, errors, events).

pub mod campaign;
pub mod errors;
pub mod events;
pub mod ids;
pub mod state;
pub mod validation;

pub use self::campaign::{Campaign, CampaignPatch, NewCampaign, PatchError};
pub use self::errors::{CampaignError, ErrorKind};
pub use self::events::CampaignEvent;
pub use self::ids::{CampaignId, OwnerId, ParseIdError};
pub use self::state::{CampaignStatus, Category, UnknownVariant};
pub use self::validation::{ValidationError, validate_for_create, validate_for_update};
