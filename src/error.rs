#[derive(Debug)]
pub enum KeyGenError {
    QuotaExhausted,
    ServiceError(u16),
    Transport(String),
    MalformedResponse(String),
    PrimeTable(String),
    RandomGenerationFailed,
    ExponentSearchExhausted,
    NoInverseExists,
    InvalidEncoding(String),
    Cancelled,
}

impl std::error::Error for KeyGenError {}

impl core::fmt::Display for KeyGenError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            KeyGenError::QuotaExhausted => {
                write!(f, "entropy service quota exhausted; try again later")
            }
            KeyGenError::ServiceError(code) => {
                write!(f, "entropy service returned HTTP status {}", code)
            }
            KeyGenError::Transport(msg) => write!(f, "entropy service unreachable: {}", msg),
            KeyGenError::MalformedResponse(msg) => {
                write!(f, "malformed entropy service response: {}", msg)
            }
            KeyGenError::PrimeTable(msg) => write!(f, "invalid small-prime table: {}", msg),
            KeyGenError::RandomGenerationFailed => write!(f, "random generation failed"),
            KeyGenError::ExponentSearchExhausted => {
                write!(f, "no odd public exponent coprime with the totient")
            }
            KeyGenError::NoInverseExists => write!(f, "modular inverse does not exist"),
            KeyGenError::InvalidEncoding(msg) => write!(f, "invalid encoding: {}", msg),
            KeyGenError::Cancelled => write!(f, "key generation cancelled"),
        }
    }
}
