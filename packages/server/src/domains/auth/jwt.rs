use anyhow::Result;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims issued by the identity provider
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,          // Subject (citizen_id as string)
    pub citizen_id: Uuid,     // Citizen UUID
    pub email: String,
    pub display_name: String,
    pub is_admin: bool,
    pub exp: i64,             // Expiration timestamp
    pub iat: i64,             // Issued at timestamp
    pub iss: String,          // Issuer
    pub jti: String,          // JWT ID (unique token identifier)
}

/// Verifies identity-provider tokens (HS256, shared secret)
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl JwtService {
    /// Create new JWT service with secret and issuer
    pub fn new(secret: &str, issuer: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
        }
    }

    /// Mint a token the way the identity provider does. Used by tests and
    /// local tooling; production tokens come from the provider.
    ///
    /// Token expires after 24 hours
    pub fn create_token(
        &self,
        citizen_id: Uuid,
        email: &str,
        display_name: &str,
        is_admin: bool,
    ) -> Result<String> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::hours(24);

        let claims = Claims {
            sub: citizen_id.to_string(),
            citizen_id,
            email: email.to_string(),
            display_name: display_name.to_string(),
            is_admin,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(Into::into)
    }

    /// Verify and decode a JWT token
    ///
    /// Returns claims if token is valid, unexpired and from our issuer
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_verify_token() {
        let service = JwtService::new("test_secret_key", "test_issuer".to_string());
        let citizen_id = Uuid::new_v4();

        let token = service
            .create_token(citizen_id, "asha@example.in", "Asha", true)
            .unwrap();

        let claims = service.verify_token(&token).unwrap();
        assert_eq!(claims.citizen_id, citizen_id);
        assert_eq!(claims.email, "asha@example.in");
        assert_eq!(claims.display_name, "Asha");
        assert!(claims.is_admin);
        assert_eq!(claims.iss, "test_issuer");
    }

    #[test]
    fn test_invalid_token() {
        let service = JwtService::new("test_secret_key", "test_issuer".to_string());
        assert!(service.verify_token("invalid_token").is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let service1 = JwtService::new("secret1", "test_issuer".to_string());
        let service2 = JwtService::new("secret2", "test_issuer".to_string());

        let token = service1
            .create_token(Uuid::new_v4(), "a@b.in", "A", false)
            .unwrap();

        assert!(service2.verify_token(&token).is_err());
    }

    #[test]
    fn test_wrong_issuer() {
        let ours = JwtService::new("shared", "citywatch".to_string());
        let theirs = JwtService::new("shared", "someone-else".to_string());

        let token = theirs
            .create_token(Uuid::new_v4(), "a@b.in", "A", false)
            .unwrap();

        assert!(ours.verify_token(&token).is_err());
    }
}
