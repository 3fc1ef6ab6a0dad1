//! Rule-string validation walkthrough

use std::sync::Arc;

use serde_json::json;
use smart_validation::{CustomMessages, CustomRule, Data, InMemoryPresenceVerifier, RuleSet, Validator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("smart-validation demo");
    println!("=====================\n");

    let mut existing = Data::new();
    existing.insert("id".to_string(), json!(1));
    existing.insert("email".to_string(), json!("taken@example.com"));
    let verifier = InMemoryPresenceVerifier::new().with_row("users", existing);

    let validator = Validator::new()
        .with_presence_verifier(Arc::new(verifier))
        .extend(CustomRule::new(
            "lowercase",
            "The :attribute must be lowercase.",
            |_, value, _, _| value.as_str().map(|s| s == s.to_lowercase()).unwrap_or(false),
        ));

    let rules = RuleSet::new()
        .with("username", "required|alpha_dash|between:3,16|lowercase")
        .with("email", "required|email|unique:users")
        .with("age", "integer|min:18")
        .with("password", "required|min:8|confirmed");

    let mut messages = CustomMessages::new();
    messages.insert("email.unique".to_string(), "That :attribute is already registered.".to_string());

    let mut input = Data::new();
    input.insert("username".to_string(), json!("Ferris"));
    input.insert("email".to_string(), json!("taken@example.com"));
    input.insert("age".to_string(), json!("16"));
    input.insert("password".to_string(), json!("hunter22"));
    input.insert("password_confirmation".to_string(), json!("hunter23"));

    match validator.evaluate(&input, &rules, &messages).await {
        Ok(()) => println!("input is valid"),
        Err(errors) => {
            println!("{}\n", errors);
            println!("{}", serde_json::to_string_pretty(&errors.to_json())?);
        }
    }

    Ok(())
}
