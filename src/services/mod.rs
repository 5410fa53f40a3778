pub mod conversation;

pub use conversation::{
    ConversationEngine, EnginePorts, EngineSettings, FieldUpdate, RecoverableFailure,
    RequestContext, StepOutcome,
};
