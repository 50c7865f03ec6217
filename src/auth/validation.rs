use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

use crate::auth::dto::{LoginRequest, RegisterRequest, UpdateRoleRequest};
use crate::auth::repo_types::Role;
use crate::error::{ApiError, FieldErrors};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn check_email(errors: &mut FieldErrors, email: &str) {
    if !is_valid_email(email) {
        errors.push("email", "Invalid email");
    }
}

fn check_password(errors: &mut FieldErrors, password: &str) {
    let len = password.chars().count();
    if len < 6 {
        errors.push("password", "Must be at least 6 characters");
    } else if len > 25 {
        errors.push("password", "Must be at most 25 characters");
    }
}

pub fn validate_register(req: &RegisterRequest) -> Result<(), ApiError> {
    let mut errors = FieldErrors::default();
    check_email(&mut errors, &req.email);
    let len = req.username.chars().count();
    if len < 3 {
        errors.push("username", "Must be at least 3 characters");
    } else if len > 20 {
        errors.push("username", "Must be at most 20 characters");
    }
    check_password(&mut errors, &req.password);
    errors.into_result()
}

pub fn validate_login(req: &LoginRequest) -> Result<(), ApiError> {
    let mut errors = FieldErrors::default();
    check_email(&mut errors, &req.email);
    check_password(&mut errors, &req.password);
    errors.into_result()
}

pub fn validate_update_role(req: &UpdateRoleRequest) -> Result<(Uuid, Role), ApiError> {
    let mut errors = FieldErrors::default();
    let user_id = match Uuid::parse_str(&req.user_id) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.push("userId", "Must be a valid user id");
            None
        }
    };
    let role = match Role::parse(&req.user_role) {
        Some(role) => Some(role),
        None => {
            errors.push("userRole", "Must be one of: user, admin");
            None
        }
    };
    errors.into_result()?;
    Ok((user_id.unwrap(), role.unwrap()))
}
