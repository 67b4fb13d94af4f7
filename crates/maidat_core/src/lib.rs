pub mod domain;
pub mod ports;
pub mod requester;
pub mod shell;

pub use domain::{DailyContent, Day, DayError, Fiqh, Introduction, Mihrab, Sira};
pub use ports::{ContentGenerationService, GenerationRequest, PortError, PortResult};
pub use requester::{ContentError, DailyContentRequester};
pub use shell::{RequestToken, Resolution, ShellState, ViewState, LOAD_ERROR_MESSAGE};
