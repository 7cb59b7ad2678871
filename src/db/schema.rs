// src/db/schema.rs
// DOCUMENTATION: Field whitelists for every resource exposed through QueryBuilder
// PURPOSE: Map camelCase API fields onto SQL columns and relations

/// How a query-string value is coerced before it is bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Bool,
    Float,
    Uuid,
    Timestamp,
    /// PostgreSQL enum; compared through a `::text` cast
    Enum,
}

#[derive(Debug)]
pub struct Column {
    /// Name used in query strings and JSON output
    pub field: &'static str,
    /// SQL column name
    pub column: &'static str,
    pub kind: ColumnKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// Embedded as a single object (or null)
    BelongsTo,
    /// Embedded as an array
    HasMany,
}

/// Join from a model to another one: `target.remote_column = model.local_column`
#[derive(Debug)]
pub struct Relation {
    pub name: &'static str,
    pub target: &'static ModelSchema,
    pub kind: RelationKind,
    pub local_column: &'static str,
    pub remote_column: &'static str,
    /// Fields of the target embedded when the relation is included
    pub fields: &'static [&'static str],
}

#[derive(Debug)]
pub struct ModelSchema {
    pub name: &'static str,
    pub table: &'static str,
    pub alias: &'static str,
    pub primary_key: &'static str,
    pub columns: &'static [Column],
    pub relations: &'static [Relation],
}

impl ModelSchema {
    pub fn column(&self, field: &str) -> Option<&'static Column> {
        self.columns.iter().find(|c| c.field == field)
    }

    pub fn relation(&self, name: &str) -> Option<&'static Relation> {
        self.relations.iter().find(|r| r.name == name)
    }

    pub fn primary_column(&self) -> &'static Column {
        // Every model lists its primary key first
        &self.columns[0]
    }
}

const fn col(field: &'static str, column: &'static str, kind: ColumnKind) -> Column {
    Column {
        field,
        column,
        kind,
    }
}

static USER_COLUMNS: [Column; 15] = [
    col("id", "id", ColumnKind::Uuid),
    col("fullName", "full_name", ColumnKind::Text),
    col("email", "email", ColumnKind::Text),
    col("phoneNumber", "phone_number", ColumnKind::Text),
    col("role", "role", ColumnKind::Enum),
    col("status", "status", ColumnKind::Enum),
    col("isEmailVerified", "is_email_verified", ColumnKind::Bool),
    col("describe", "describe", ColumnKind::Text),
    col("city", "city", ColumnKind::Text),
    col("address", "address", ColumnKind::Text),
    col("profile", "profile", ColumnKind::Text),
    col("hasPremiumAccess", "has_premium_access", ColumnKind::Bool),
    col("isDeleted", "is_deleted", ColumnKind::Bool),
    col("createdAt", "created_at", ColumnKind::Timestamp),
    col("updatedAt", "updated_at", ColumnKind::Timestamp),
];

/// Users; password and OTP columns are intentionally not listed
pub static USERS: ModelSchema = ModelSchema {
    name: "user",
    table: "users",
    alias: "u",
    primary_key: "id",
    columns: &USER_COLUMNS,
    relations: &[],
};

static SUBCATEGORY_COLUMNS: [Column; 11] = [
    col("id", "id", ColumnKind::Uuid),
    col("name", "name", ColumnKind::Text),
    col("description", "description", ColumnKind::Text),
    col("image", "image", ColumnKind::Text),
    col("categoryType", "category_type", ColumnKind::Enum),
    col("isPremium", "is_premium", ColumnKind::Bool),
    col("premiumPrice", "premium_price", ColumnKind::Float),
    col("stripePriceId", "stripe_price_id", ColumnKind::Text),
    col("stripeProductId", "stripe_product_id", ColumnKind::Text),
    col("createdAt", "created_at", ColumnKind::Timestamp),
    col("updatedAt", "updated_at", ColumnKind::Timestamp),
];

static SUBCATEGORY_RELATIONS: [Relation; 1] = [Relation {
    name: "places",
    target: &PLACES,
    kind: RelationKind::HasMany,
    local_column: "id",
    remote_column: "subcategory_id",
    fields: &[
        "id",
        "placeTitle",
        "placeDescription",
        "imageUrl",
        "subscriptionType",
        "price",
    ],
}];

pub static SUBCATEGORIES: ModelSchema = ModelSchema {
    name: "subcategory",
    table: "subcategories",
    alias: "s",
    primary_key: "id",
    columns: &SUBCATEGORY_COLUMNS,
    relations: &SUBCATEGORY_RELATIONS,
};

static PLACE_COLUMNS: [Column; 19] = [
    col("id", "id", ColumnKind::Uuid),
    col("placeTitle", "place_title", ColumnKind::Text),
    col("placeDescription", "place_description", ColumnKind::Text),
    col("placeLocation", "place_location", ColumnKind::Text),
    col("aboutPlace", "about_place", ColumnKind::Text),
    col("howToGoThere", "how_to_go_there", ColumnKind::Text),
    col("suggestedVisitTime", "suggested_visit_time", ColumnKind::Text),
    col("imageUrl", "image_url", ColumnKind::Text),
    col("categoryType", "category_type", ColumnKind::Enum),
    col("subcategoryId", "subcategory_id", ColumnKind::Uuid),
    col("price", "price", ColumnKind::Float),
    col("stripePriceId", "stripe_price_id", ColumnKind::Text),
    col("stripeProductId", "stripe_product_id", ColumnKind::Text),
    col("subscriptionType", "subscription_type", ColumnKind::Enum),
    col("userId", "user_id", ColumnKind::Uuid),
    col("latitude", "latitude", ColumnKind::Float),
    col("longitude", "longitude", ColumnKind::Float),
    col("createdAt", "created_at", ColumnKind::Timestamp),
    col("updatedAt", "updated_at", ColumnKind::Timestamp),
];

static PLACE_RELATIONS: [Relation; 2] = [
    Relation {
        name: "subcategory",
        target: &SUBCATEGORIES,
        kind: RelationKind::BelongsTo,
        local_column: "subcategory_id",
        remote_column: "id",
        fields: &[
            "id",
            "name",
            "description",
            "categoryType",
            "isPremium",
            "premiumPrice",
            "stripePriceId",
            "stripeProductId",
        ],
    },
    Relation {
        name: "user",
        target: &USERS,
        kind: RelationKind::BelongsTo,
        local_column: "user_id",
        remote_column: "id",
        fields: &["id", "fullName", "email"],
    },
];

pub static PLACES: ModelSchema = ModelSchema {
    name: "place",
    table: "places",
    alias: "p",
    primary_key: "id",
    columns: &PLACE_COLUMNS,
    relations: &PLACE_RELATIONS,
};

static PAYMENT_COLUMNS: [Column; 11] = [
    col("id", "id", ColumnKind::Uuid),
    col("userId", "user_id", ColumnKind::Uuid),
    col("subcategoryId", "subcategory_id", ColumnKind::Uuid),
    col("amount", "amount", ColumnKind::Float),
    col("currency", "currency", ColumnKind::Text),
    col("status", "status", ColumnKind::Enum),
    col("stripePaymentId", "stripe_payment_id", ColumnKind::Text),
    col("stripeSessionId", "stripe_session_id", ColumnKind::Text),
    col("stripeCustomerId", "stripe_customer_id", ColumnKind::Text),
    col("createdAt", "created_at", ColumnKind::Timestamp),
    col("updatedAt", "updated_at", ColumnKind::Timestamp),
];

static PAYMENT_RELATIONS: [Relation; 1] = [Relation {
    name: "user",
    target: &USERS,
    kind: RelationKind::BelongsTo,
    local_column: "user_id",
    remote_column: "id",
    fields: &["id", "fullName", "email"],
}];

pub static PAYMENTS: ModelSchema = ModelSchema {
    name: "payment",
    table: "payments",
    alias: "pay",
    primary_key: "id",
    columns: &PAYMENT_COLUMNS,
    relations: &PAYMENT_RELATIONS,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_key_listed_first() {
        for model in [&USERS, &SUBCATEGORIES, &PLACES, &PAYMENTS] {
            assert_eq!(model.primary_column().field, model.primary_key);
        }
    }

    #[test]
    fn test_relation_fields_exist_on_target() {
        for model in [&USERS, &SUBCATEGORIES, &PLACES, &PAYMENTS] {
            for relation in model.relations {
                for field in relation.fields {
                    assert!(
                        relation.target.column(field).is_some(),
                        "{}.{} missing on {}",
                        model.name,
                        field,
                        relation.target.name
                    );
                }
            }
        }
    }

    #[test]
    fn test_users_do_not_expose_secrets() {
        assert!(USERS.column("password").is_none());
        assert!(USERS.column("otp").is_none());
        assert!(USERS.columns.iter().all(|c| c.column != "password"));
    }
}
