use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};

use crate::db::entities::user;
use crate::web::error::{is_unique_violation, AppError};
use crate::web::models::{Claims, LoginRequest, LoginResponse, RegisterRequest};
use crate::web::models::user_models::ProfileResponse;

const MIN_PASSWORD_LEN: usize = 8;

pub async fn register_user(
    db: &DatabaseConnection,
    req: RegisterRequest,
) -> Result<ProfileResponse, AppError> {
    if req.email.is_empty() || req.username.is_empty() {
        return Err(AppError::InvalidInput(
            "email and username must not be empty".to_string(),
        ));
    }
    if req.email != req.email.to_lowercase() {
        return Err(AppError::InvalidInput(
            "email: must be lowercase".to_string(),
        ));
    }
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidInput(format!(
            "password: at least {MIN_PASSWORD_LEN} characters required"
        )));
    }

    let existing = user::Entity::find()
        .filter(
            Condition::any()
                .add(user::Column::Email.eq(&req.email))
                .add(user::Column::Username.eq(&req.username)),
        )
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "A user with this email or username already exists.".to_string(),
        ));
    }

    let password_hash = hash(&req.password, DEFAULT_COST)
        .map_err(|e| AppError::PasswordHashingError(e.to_string()))?;

    let new_user = user::ActiveModel {
        email: Set(req.email),
        username: Set(req.username),
        first_name: Set(req.first_name),
        last_name: Set(req.last_name),
        password_hash: Set(password_hash),
        avatar: Set(None),
        is_admin: Set(false),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    match new_user.insert(db).await {
        Ok(user_model) => Ok(ProfileResponse::from_model(&user_model, false)),
        Err(e) if is_unique_violation(&e) => Err(AppError::Conflict(
            "A user with this email or username already exists.".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

pub async fn login_user(
    db: &DatabaseConnection,
    req: LoginRequest,
    jwt_secret: &str,
) -> Result<LoginResponse, AppError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(AppError::InvalidInput(
            "email and password must not be empty".to_string(),
        ));
    }

    let user = user::Entity::find()
        .filter(user::Column::Email.eq(&req.email))
        .one(db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let valid_password = verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::InternalServerError(format!("Password verification failed: {e}")))?;
    if !valid_password {
        return Err(AppError::InvalidCredentials);
    }

    create_jwt_for_user(&user, jwt_secret)
}

pub fn create_jwt_for_user(
    user: &user::Model,
    jwt_secret: &str,
) -> Result<LoginResponse, AppError> {
    let now = Utc::now();
    let expiration = (now + Duration::hours(24)).timestamp() as usize;

    let claims = Claims {
        sub: user.email.clone(),
        user_id: user.id,
        is_admin: user.is_admin,
        exp: expiration,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_ref()),
    )
    .map_err(|e| AppError::TokenCreationError(e.to_string()))?;

    Ok(LoginResponse {
        token,
        user_id: user.id,
        email: user.email.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            username: "chef".to_string(),
            first_name: "Анна".to_string(),
            last_name: "Иванова".to_string(),
            password: "correct horse".to_string(),
        }
    }

    #[tokio::test]
    async fn uppercase_email_is_rejected_before_any_query() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let err = register_user(&db, register_request("Chef@Example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let mut req = register_request("chef@example.com");
        req.password = "short".to_string();
        let err = register_user(&db, req).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn issued_tokens_decode_back_to_the_user() {
        use jsonwebtoken::{decode, DecodingKey, Validation};

        let user = user::Model {
            id: 9,
            email: "chef@example.com".to_string(),
            username: "chef".to_string(),
            first_name: "Анна".to_string(),
            last_name: "Иванова".to_string(),
            password_hash: "$2b$12$hash".to_string(),
            avatar: None,
            is_admin: true,
            created_at: Utc::now(),
        };
        let response = create_jwt_for_user(&user, "test-secret").unwrap();
        let data = decode::<Claims>(
            &response.token,
            &DecodingKey::from_secret("test-secret".as_ref()),
            &Validation::default(),
        )
        .unwrap();
        assert_eq!(data.claims.user_id, 9);
        assert!(data.claims.is_admin);
        assert_eq!(data.claims.sub, "chef@example.com");
    }
}
