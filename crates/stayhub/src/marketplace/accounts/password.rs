use bcrypt::DEFAULT_COST;

#[derive(Debug, thiserror::Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordError(#[from] bcrypt::BcryptError);

pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    Ok(bcrypt::hash(password, DEFAULT_COST)?)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    Ok(bcrypt::verify(password, hash)?)
}
