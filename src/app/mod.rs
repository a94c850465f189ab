pub mod ports;
pub mod run_use_case;
pub mod upload_use_case;
pub mod validate_use_case;

pub use run_use_case::{RunReport, RunRequest, RunUseCase};
pub use upload_use_case::UploadUseCase;
pub use validate_use_case::ValidateUseCase;
