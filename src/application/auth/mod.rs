//! Authentication use cases

pub mod use_cases;

pub use use_cases::{
    LoginUseCase, RegisterAccountUseCase, RegisterInput, RequestPasswordResetUseCase,
};
