//! Client side of the job lifecycle: submit a request, poll for its result,
//! present the variants.

pub mod api;
pub mod gallery;
pub mod poller;
pub mod session;

pub use api::{ClientError, GenerationBackend, LogoApiClient, ResultSnapshot};
pub use gallery::{Gallery, GalleryTile};
pub use poller::{poll_until_terminal, PollConfig, PollError};
pub use session::{GenerationSession, Notification, ViewState};
