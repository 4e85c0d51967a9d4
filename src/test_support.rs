// src/test_support.rs
//
// Fixtures compartilhadas pelos testes dos serviços e do roteador.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    models::{
        auth::{NewUser, Role, User},
        moving::{AddressPayload, CreateMovingRequestPayload},
        quotes::CreateQuotePayload,
    },
    store::{memory::InMemoryStore, MarketplaceStore},
};

/// Cadastra direto no store, sem passar pelo bcrypt.
pub async fn seed_user(store: &InMemoryStore, role: Role, email: &str) -> User {
    let name = email.split('@').next().unwrap_or(email).to_string();
    store
        .create_user(&NewUser {
            name,
            email: email.into(),
            password_hash: "hash-irrelevante".into(),
            role,
            phone: Some("11999990000".into()),
        })
        .await
        .unwrap()
}

pub fn address_payload() -> AddressPayload {
    AddressPayload {
        cep: "01310-100".into(),
        street: "Avenida Paulista".into(),
        number: "1578".into(),
        complement: Some("Apto 42".into()),
        neighborhood: "Bela Vista".into(),
        city: "São Paulo".into(),
        state: "SP".into(),
    }
}

pub fn moving_payload() -> CreateMovingRequestPayload {
    CreateMovingRequestPayload {
        origin_address: address_payload(),
        destination_address: AddressPayload {
            cep: "20040020".into(),
            street: "Rua da Assembleia".into(),
            number: "10".into(),
            complement: None,
            neighborhood: "Centro".into(),
            city: "Rio de Janeiro".into(),
            state: "RJ".into(),
        },
        description: Some("Apartamento de 2 quartos".into()),
        move_date: Utc::now() + Duration::days(30),
        notes: None,
    }
}

pub fn quote_payload(request_id: Uuid, value: i64) -> CreateQuotePayload {
    CreateQuotePayload {
        request_id,
        value: Decimal::new(value * 100, 2),
        service_description: "Caminhão baú com 3 ajudantes".into(),
        deadline_days: 5,
        notes: None,
    }
}
