use serde::{Deserialize, Serialize};

use crate::query::coerce::{DocumentMapped, FieldBinding, FieldKind};

/// Login request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Account document from the `users` collection.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    /// Blanked before the record is echoed to a client.
    pub password: String,
}

impl DocumentMapped for UserRecord {
    fn bindings() -> &'static [FieldBinding<Self>] {
        const BINDINGS: &[FieldBinding<UserRecord>] = &[
            FieldBinding {
                name: "_id",
                kind: FieldKind::Text,
                assign: |u, v| {
                    if let Some(t) = v.into_text() {
                        u.id = t;
                    }
                },
            },
            FieldBinding {
                name: "username",
                kind: FieldKind::Text,
                assign: |u, v| {
                    if let Some(t) = v.into_text() {
                        u.username = t;
                    }
                },
            },
            FieldBinding {
                name: "password",
                kind: FieldKind::Text,
                assign: |u, v| {
                    if let Some(t) = v.into_text() {
                        u.password = t;
                    }
                },
            },
        ];
        BINDINGS
    }
}

/// A property listing from the `objects` collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Listing {
    pub id: String,
    pub id_owner: i32,
    pub name: String,
    pub address: String,
    pub price: i32,
    pub image_url: String,
}

impl DocumentMapped for Listing {
    fn bindings() -> &'static [FieldBinding<Self>] {
        const BINDINGS: &[FieldBinding<Listing>] = &[
            FieldBinding {
                name: "_id",
                kind: FieldKind::Text,
                assign: |l, v| {
                    if let Some(t) = v.into_text() {
                        l.id = t;
                    }
                },
            },
            FieldBinding {
                name: "id_owner",
                kind: FieldKind::Int,
                assign: |l, v| {
                    if let Some(n) = v.into_int() {
                        l.id_owner = n;
                    }
                },
            },
            FieldBinding {
                name: "name",
                kind: FieldKind::Text,
                assign: |l, v| {
                    if let Some(t) = v.into_text() {
                        l.name = t;
                    }
                },
            },
            FieldBinding {
                name: "address",
                kind: FieldKind::Text,
                assign: |l, v| {
                    if let Some(t) = v.into_text() {
                        l.address = t;
                    }
                },
            },
            FieldBinding {
                name: "price",
                kind: FieldKind::Int,
                assign: |l, v| {
                    if let Some(n) = v.into_int() {
                        l.price = n;
                    }
                },
            },
            FieldBinding {
                name: "image_url",
                kind: FieldKind::Text,
                assign: |l, v| {
                    if let Some(t) = v.into_text() {
                        l.image_url = t;
                    }
                },
            },
        ];
        BINDINGS
    }
}
