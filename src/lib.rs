pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use cli::Commands;

pub use application::{
    Categorizer, ChatClient, ChatRelayUseCase, ComplaintRepository, RetryPolicy,
    SubmitComplaintUseCase, TriageComplaintsUseCase, UpdateComplaintStatusUseCase,
};

pub use connector::relay::{self, CorsPolicy, RelayState};
pub use connector::{
    Container, ContainerConfig, GeminiClient, InMemoryComplaintRepository,
    JsonFileComplaintRepository, LlmCategorizer, MockChatClient, Router,
};

pub use domain::{
    Category, CategoryPolicy, Complaint, ComplaintStatus, DomainError, GenerationRequest,
    GenerationResult, NewComplaint,
};
