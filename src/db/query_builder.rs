// src/db/query_builder.rs
// DOCUMENTATION: Generic list query construction from HTTP query parameters
// PURPOSE: search / filter / sort / projection / pagination over any ModelSchema
//
// Only fields declared in a ModelSchema can reach the SQL text; every value is
// sent as a bound parameter. Rows come back as JSON objects built by
// PostgreSQL (jsonb_build_object) so the projection can vary per request.

use crate::db::schema::{Column, ColumnKind, ModelSchema, Relation, RelationKind};
use crate::errors::ApiError;
use crate::models::{PageMeta, Paginated};
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::PgArguments;
use sqlx::{Arguments, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

/// Query-string keys consumed by the builder itself, never treated as filters
pub const RESERVED_PARAMS: [&str; 6] = ["searchTerm", "sort", "limit", "page", "fields", "exclude"];

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;
/// Highest page whose offset still fits in an `i64` at `MAX_LIMIT`
pub const MAX_PAGE: i64 = i64::MAX / MAX_LIMIT;
pub const DEFAULT_SORT: &str = "-createdAt";

/// A value bound to a `$n` placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Bool(bool),
    Float(f64),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
}

impl BindValue {
    /// Coerce a raw query-string value into the column's type
    pub fn parse(column: &Column, raw: &str) -> Result<Self, ApiError> {
        let invalid = || {
            ApiError::InvalidInput(format!(
                "Invalid value '{}' for field '{}'",
                raw, column.field
            ))
        };

        Ok(match column.kind {
            ColumnKind::Text | ColumnKind::Enum => BindValue::Text(raw.to_string()),
            ColumnKind::Bool => match raw {
                "true" => BindValue::Bool(true),
                "false" => BindValue::Bool(false),
                _ => return Err(invalid()),
            },
            ColumnKind::Float => BindValue::Float(raw.parse().map_err(|_| invalid())?),
            ColumnKind::Uuid => BindValue::Uuid(Uuid::parse_str(raw).map_err(|_| invalid())?),
            ColumnKind::Timestamp => BindValue::Timestamp(
                DateTime::parse_from_rfc3339(raw)
                    .map_err(|_| invalid())?
                    .with_timezone(&Utc),
            ),
        })
    }

    fn add_to(&self, args: &mut PgArguments) {
        match self {
            BindValue::Text(v) => args.add(v.clone()),
            BindValue::Bool(v) => args.add(*v),
            BindValue::Float(v) => args.add(*v),
            BindValue::Uuid(v) => args.add(*v),
            BindValue::Timestamp(v) => args.add(*v),
        }
    }
}

impl From<Uuid> for BindValue {
    fn from(v: Uuid) -> Self {
        BindValue::Uuid(v)
    }
}

impl From<bool> for BindValue {
    fn from(v: bool) -> Self {
        BindValue::Bool(v)
    }
}

impl From<&str> for BindValue {
    fn from(v: &str) -> Self {
        BindValue::Text(v.to_string())
    }
}

/// A field addressed by a request: either on the model or one relation deep
enum FieldRef {
    Own(&'static Column),
    Related(&'static Relation, &'static Column),
}

/// Escape LIKE wildcards so a search term is matched literally
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn column_expr(alias: &str, column: &Column) -> String {
    match column.kind {
        ColumnKind::Enum => format!("{}.{}::text", alias, column.column),
        _ => format!("{}.{}", alias, column.column),
    }
}

fn split_list(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect()
}

pub struct QueryBuilder<'a> {
    model: &'static ModelSchema,
    params: &'a HashMap<String, String>,
    conditions: Vec<String>,
    binds: Vec<BindValue>,
    order_by: Vec<String>,
    projection: Vec<&'static Column>,
    includes: Vec<&'static Relation>,
    page: i64,
    limit: i64,
    paginated: bool,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(model: &'static ModelSchema, params: &'a HashMap<String, String>) -> Self {
        Self {
            model,
            params,
            conditions: Vec::new(),
            binds: Vec::new(),
            order_by: Vec::new(),
            projection: model.columns.iter().collect(),
            includes: Vec::new(),
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            paginated: false,
        }
    }

    fn unknown_field(&self, field: &str) -> ApiError {
        ApiError::InvalidInput(format!("Unknown field '{}' for {}", field, self.model.name))
    }

    fn resolve(&self, path: &str) -> Result<FieldRef, ApiError> {
        let parts: Vec<&str> = path.split('.').collect();
        match parts.as_slice() {
            [field] => self
                .model
                .column(field)
                .map(FieldRef::Own)
                .ok_or_else(|| self.unknown_field(path)),
            [relation, field] => {
                let relation = self
                    .model
                    .relation(relation)
                    .ok_or_else(|| self.unknown_field(path))?;
                let column = relation
                    .target
                    .column(field)
                    .ok_or_else(|| self.unknown_field(path))?;
                Ok(FieldRef::Related(relation, column))
            }
            _ => Err(ApiError::InvalidInput(format!(
                "Field '{}' is nested too deeply",
                path
            ))),
        }
    }

    fn own_column(&self, field: &str) -> Result<&'static Column, ApiError> {
        self.model
            .column(field)
            .ok_or_else(|| self.unknown_field(field))
    }

    fn relation_alias(&self, relation: &Relation) -> String {
        format!("{}_{}", self.model.alias, relation.name)
    }

    fn push_bind(&mut self, value: BindValue) -> String {
        self.binds.push(value);
        format!("${}", self.binds.len())
    }

    /// `<field> <op> <placeholder>`, through EXISTS when the field is on a relation
    fn comparison(&self, field: &FieldRef, op: &str, placeholder: &str) -> String {
        match field {
            FieldRef::Own(column) => {
                format!("{} {} {}", column_expr(self.model.alias, column), op, placeholder)
            }
            FieldRef::Related(relation, column) => {
                let alias = self.relation_alias(relation);
                format!(
                    "EXISTS (SELECT 1 FROM {table} {ra} WHERE {ra}.{remote} = {a}.{local} AND {expr} {op} {ph})",
                    table = relation.target.table,
                    ra = alias,
                    remote = relation.remote_column,
                    a = self.model.alias,
                    local = relation.local_column,
                    expr = column_expr(&alias, column),
                    op = op,
                    ph = placeholder,
                )
            }
        }
    }

    /// Case-insensitive substring match of `searchTerm` across the given fields
    pub fn search(mut self, searchable_fields: &[&str]) -> Result<Self, ApiError> {
        let term = match self.params.get("searchTerm").map(|t| t.trim()) {
            Some(term) if !term.is_empty() => term.to_string(),
            _ => return Ok(self),
        };

        let fields = searchable_fields
            .iter()
            .map(|f| self.resolve(f))
            .collect::<Result<Vec<_>, _>>()?;
        if fields.is_empty() {
            return Ok(self);
        }

        let placeholder = self.push_bind(BindValue::Text(format!("%{}%", escape_like(&term))));
        let clauses: Vec<String> = fields
            .iter()
            .map(|f| self.comparison(f, "ILIKE", &placeholder))
            .collect();

        self.conditions.push(format!("({})", clauses.join(" OR ")));
        Ok(self)
    }

    /// Equality filters from every non-reserved parameter
    pub fn filter(mut self) -> Result<Self, ApiError> {
        let mut keys: Vec<&String> = self
            .params
            .keys()
            .filter(|k| !RESERVED_PARAMS.contains(&k.as_str()))
            .collect();
        keys.sort();

        for key in keys {
            let raw = &self.params[key];
            if raw.is_empty() {
                continue;
            }
            let field = self.resolve(key)?;
            let column = match &field {
                FieldRef::Own(c) | FieldRef::Related(_, c) => *c,
            };
            let placeholder = self.push_bind(BindValue::parse(column, raw)?);
            let clause = self.comparison(&field, "=", &placeholder);
            self.conditions.push(clause);
        }
        Ok(self)
    }

    /// Programmatic equality condition
    pub fn where_eq(mut self, field: &str, value: impl Into<BindValue>) -> Result<Self, ApiError> {
        let field = self.resolve(field)?;
        let placeholder = self.push_bind(value.into());
        let clause = self.comparison(&field, "=", &placeholder);
        self.conditions.push(clause);
        Ok(self)
    }

    /// Embed a relation in every row
    pub fn include(mut self, relation: &str) -> Result<Self, ApiError> {
        let relation = self
            .model
            .relation(relation)
            .ok_or_else(|| self.unknown_field(relation))?;
        if !self.includes.iter().any(|r| r.name == relation.name) {
            self.includes.push(relation);
        }
        Ok(self)
    }

    /// Replace the projection with an explicit field list
    pub fn select(mut self, fields: &[&str]) -> Result<Self, ApiError> {
        self.projection = fields
            .iter()
            .map(|f| self.own_column(f))
            .collect::<Result<Vec<_>, _>>()?;
        self.ensure_projection();
        Ok(self)
    }

    /// `sort=a,-b`; `-` means descending
    pub fn sort(mut self) -> Result<Self, ApiError> {
        let raw = self
            .params
            .get("sort")
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_SORT);

        let mut order_by = Vec::new();
        for entry in split_list(raw) {
            let (field, direction) = match entry.strip_prefix('-') {
                Some(field) => (field, "DESC"),
                None => (entry, "ASC"),
            };
            let column = self.own_column(field)?;
            order_by.push(format!("{}.{} {}", self.model.alias, column.column, direction));
        }

        // Tie-break on the primary key so pages never overlap
        let pk = self.model.primary_column();
        if !order_by
            .iter()
            .any(|o| o.starts_with(&format!("{}.{} ", self.model.alias, pk.column)))
        {
            order_by.push(format!("{}.{} ASC", self.model.alias, pk.column));
        }

        self.order_by = order_by;
        Ok(self)
    }

    /// `page` / `limit`, falling back to defaults for missing or invalid values
    pub fn paginate(mut self) -> Self {
        let read = |key: &str| {
            self.params
                .get(key)
                .and_then(|v| v.trim().parse::<i64>().ok())
                .filter(|v| *v > 0)
        };
        self.page = read("page").unwrap_or(DEFAULT_PAGE).min(MAX_PAGE);
        self.limit = read("limit").unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        self.paginated = true;
        self
    }

    /// `fields=a,b,-c`: positive entries restrict, negative entries remove
    pub fn fields(mut self) -> Result<Self, ApiError> {
        let entries = match self.params.get("fields") {
            Some(raw) => split_list(raw),
            None => return Ok(self),
        };
        if entries.is_empty() {
            return Ok(self);
        }

        let mut include = Vec::new();
        let mut remove = Vec::new();
        for entry in entries {
            match entry.strip_prefix('-') {
                Some(field) => remove.push(self.own_column(field)?),
                None => include.push(self.own_column(entry)?),
            }
        }

        if !include.is_empty() {
            self.projection = include;
        }
        self.projection
            .retain(|c| !remove.iter().any(|r| r.field == c.field));
        self.ensure_projection();
        Ok(self)
    }

    /// `exclude=a,b`: drop fields from the current projection
    pub fn exclude(mut self) -> Result<Self, ApiError> {
        let entries = match self.params.get("exclude") {
            Some(raw) => split_list(raw),
            None => return Ok(self),
        };

        let remove = entries
            .iter()
            .map(|f| self.own_column(f))
            .collect::<Result<Vec<_>, _>>()?;
        self.projection
            .retain(|c| !remove.iter().any(|r| r.field == c.field));
        self.ensure_projection();
        Ok(self)
    }

    fn ensure_projection(&mut self) {
        if self.projection.is_empty() {
            self.projection.push(self.model.primary_column());
        }
    }

    fn object_sql(alias: &str, columns: &[&Column]) -> Vec<String> {
        columns
            .iter()
            .map(|c| format!("'{}', {}.{}", c.field, alias, c.column))
            .collect()
    }

    fn projection_sql(&self) -> String {
        let mut pairs = Self::object_sql(self.model.alias, &self.projection);

        for relation in &self.includes {
            let alias = self.relation_alias(relation);
            let columns: Vec<&Column> = relation
                .fields
                .iter()
                .filter_map(|f| relation.target.column(f))
                .collect();
            let object = format!("jsonb_build_object({})", Self::object_sql(&alias, &columns).join(", "));
            let join = format!(
                "FROM {} {} WHERE {}.{} = {}.{}",
                relation.target.table,
                alias,
                alias,
                relation.remote_column,
                self.model.alias,
                relation.local_column
            );
            let value = match relation.kind {
                RelationKind::BelongsTo => format!("(SELECT {} {})", object, join),
                RelationKind::HasMany => format!(
                    "COALESCE((SELECT jsonb_agg({}) {}), '[]'::jsonb)",
                    object, join
                ),
            };
            pairs.push(format!("'{}', {}", relation.name, value));
        }

        format!("jsonb_build_object({})", pairs.join(", "))
    }

    fn where_sql(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// Data and count statements for the current state
    pub fn to_sql(&self) -> (String, String) {
        let mut data_sql = format!(
            "SELECT {} FROM {} {}{}",
            self.projection_sql(),
            self.model.table,
            self.model.alias,
            self.where_sql()
        );
        if !self.order_by.is_empty() {
            data_sql.push_str(&format!(" ORDER BY {}", self.order_by.join(", ")));
        }
        if self.paginated {
            data_sql.push_str(&format!(
                " LIMIT {} OFFSET {}",
                self.limit,
                (self.page - 1) * self.limit
            ));
        }

        let count_sql = format!(
            "SELECT COUNT(*) FROM {} {}{}",
            self.model.table,
            self.model.alias,
            self.where_sql()
        );

        (data_sql, count_sql)
    }

    pub fn binds(&self) -> &[BindValue] {
        &self.binds
    }

    fn arguments(&self) -> PgArguments {
        let mut args = PgArguments::default();
        for value in &self.binds {
            value.add_to(&mut args);
        }
        args
    }

    /// Run the page query and the count query concurrently
    pub async fn execute(self, pool: &PgPool) -> Result<Paginated<Value>, ApiError> {
        let (data_sql, count_sql) = self.to_sql();
        log::debug!("QueryBuilder[{}]: {}", self.model.name, data_sql);

        let (data, total) = tokio::try_join!(
            sqlx::query_scalar_with::<_, Value, _>(&data_sql, self.arguments()).fetch_all(pool),
            sqlx::query_scalar_with::<_, i64, _>(&count_sql, self.arguments()).fetch_one(pool),
        )
        .map_err(|e| {
            log::error!("QueryBuilder[{}] failed: {}", self.model.name, e);
            ApiError::from(e)
        })?;

        Ok(Paginated {
            data,
            meta: PageMeta::new(self.page, self.limit, total),
        })
    }

    /// Every matching row, honouring pagination only if paginate() was called
    pub async fn fetch_all(self, pool: &PgPool) -> Result<Vec<Value>, ApiError> {
        let (data_sql, _) = self.to_sql();
        log::debug!("QueryBuilder[{}]: {}", self.model.name, data_sql);

        sqlx::query_scalar_with::<_, Value, _>(&data_sql, self.arguments())
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("QueryBuilder[{}] failed: {}", self.model.name, e);
                ApiError::from(e)
            })
    }

    /// First matching row, if any
    pub async fn fetch_optional(self, pool: &PgPool) -> Result<Option<Value>, ApiError> {
        let (mut data_sql, _) = self.to_sql();
        if !self.paginated {
            data_sql.push_str(" LIMIT 1");
        }
        log::debug!("QueryBuilder[{}]: {}", self.model.name, data_sql);

        sqlx::query_scalar_with::<_, Value, _>(&data_sql, self.arguments())
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("QueryBuilder[{}] failed: {}", self.model.name, e);
                ApiError::from(e)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::{PLACES, SUBCATEGORIES, USERS};

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_search_builds_or_group_with_single_bind() {
        let p = params(&[("searchTerm", "ana")]);
        let qb = QueryBuilder::new(&USERS, &p)
            .search(&["fullName", "email"])
            .unwrap();
        let (sql, count) = qb.to_sql();

        assert!(sql.contains("WHERE (u.full_name ILIKE $1 OR u.email ILIKE $1)"));
        assert!(count.ends_with("WHERE (u.full_name ILIKE $1 OR u.email ILIKE $1)"));
        assert_eq!(qb.binds(), &[BindValue::Text("%ana%".into())]);
    }

    #[test]
    fn test_search_escapes_wildcards() {
        let p = params(&[("searchTerm", "50%_off")]);
        let qb = QueryBuilder::new(&USERS, &p).search(&["city"]).unwrap();
        assert_eq!(qb.binds(), &[BindValue::Text("%50\\%\\_off%".into())]);
    }

    #[test]
    fn test_blank_search_term_is_ignored() {
        let p = params(&[("searchTerm", "   ")]);
        let qb = QueryBuilder::new(&USERS, &p).search(&["city"]).unwrap();
        assert!(!qb.to_sql().0.contains("WHERE"));
        assert!(qb.binds().is_empty());
    }

    #[test]
    fn test_search_through_relation_uses_exists() {
        let p = params(&[("searchTerm", "surf")]);
        let qb = QueryBuilder::new(&PLACES, &p)
            .search(&["placeTitle", "subcategory.name"])
            .unwrap();
        let (sql, _) = qb.to_sql();

        assert!(sql.contains("p.place_title ILIKE $1"));
        assert!(sql.contains(
            "EXISTS (SELECT 1 FROM subcategories p_subcategory WHERE p_subcategory.id = p.subcategory_id AND p_subcategory.name ILIKE $1)"
        ));
    }

    #[test]
    fn test_filter_skips_reserved_and_coerces_types() {
        let p = params(&[
            ("searchTerm", "x"),
            ("page", "2"),
            ("isPremium", "true"),
            ("categoryType", "Beach_Life"),
        ]);
        let qb = QueryBuilder::new(&SUBCATEGORIES, &p).filter().unwrap();
        let (sql, _) = qb.to_sql();

        // keys are applied in sorted order
        assert!(sql.contains("WHERE s.category_type::text = $1 AND s.is_premium = $2"));
        assert_eq!(
            qb.binds(),
            &[
                BindValue::Text("Beach_Life".into()),
                BindValue::Bool(true)
            ]
        );
    }

    #[test]
    fn test_filter_nested_key() {
        let p = params(&[("subcategory.name", "Surf")]);
        let qb = QueryBuilder::new(&PLACES, &p).filter().unwrap();
        let (sql, _) = qb.to_sql();
        assert!(sql.contains("p_subcategory.name = $1)"));
    }

    #[test]
    fn test_filter_rejects_unknown_and_invalid() {
        let p = params(&[("password", "x")]);
        assert!(matches!(
            QueryBuilder::new(&USERS, &p).filter(),
            Err(ApiError::InvalidInput(_))
        ));

        let p = params(&[("isDeleted", "maybe")]);
        assert!(QueryBuilder::new(&USERS, &p).filter().is_err());

        let p = params(&[("subcategory.places.id", "x")]);
        assert!(QueryBuilder::new(&PLACES, &p).filter().is_err());
    }

    #[test]
    fn test_filter_ignores_empty_values() {
        let p = params(&[("city", "")]);
        let qb = QueryBuilder::new(&USERS, &p).filter().unwrap();
        assert!(qb.binds().is_empty());
    }

    #[test]
    fn test_where_eq_merges_with_filters() {
        let p = params(&[("city", "Porto")]);
        let qb = QueryBuilder::new(&USERS, &p)
            .filter()
            .unwrap()
            .where_eq("isDeleted", false)
            .unwrap();
        let (sql, _) = qb.to_sql();
        assert!(sql.contains("WHERE u.city = $1 AND u.is_deleted = $2"));
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let p = params(&[]);
        let (sql, _) = QueryBuilder::new(&USERS, &p).sort().unwrap().to_sql();
        assert!(sql.ends_with("ORDER BY u.created_at DESC, u.id ASC"));
    }

    #[test]
    fn test_sort_multiple_fields() {
        let p = params(&[("sort", "fullName,-city")]);
        let (sql, _) = QueryBuilder::new(&USERS, &p).sort().unwrap().to_sql();
        assert!(sql.contains("ORDER BY u.full_name ASC, u.city DESC, u.id ASC"));

        let p = params(&[("sort", "-id")]);
        let (sql, _) = QueryBuilder::new(&USERS, &p).sort().unwrap().to_sql();
        assert!(sql.ends_with("ORDER BY u.id DESC"));

        let p = params(&[("sort", "password")]);
        assert!(QueryBuilder::new(&USERS, &p).sort().is_err());
    }

    #[test]
    fn test_paginate_defaults_and_offsets() {
        let p = params(&[]);
        let (sql, _) = QueryBuilder::new(&USERS, &p).paginate().to_sql();
        assert!(sql.ends_with("LIMIT 10 OFFSET 0"));

        let p = params(&[("page", "3"), ("limit", "5")]);
        let (sql, _) = QueryBuilder::new(&USERS, &p).paginate().to_sql();
        assert!(sql.ends_with("LIMIT 5 OFFSET 10"));

        let p = params(&[("page", "abc"), ("limit", "0")]);
        let (sql, _) = QueryBuilder::new(&USERS, &p).paginate().to_sql();
        assert!(sql.ends_with("LIMIT 10 OFFSET 0"));

        let p = params(&[("limit", "5000")]);
        let (sql, _) = QueryBuilder::new(&USERS, &p).paginate().to_sql();
        assert!(sql.ends_with("LIMIT 100 OFFSET 0"));
    }

    #[test]
    fn test_paginate_clamps_huge_page() {
        let p = params(&[("page", "9223372036854775807"), ("limit", "100")]);
        let (sql, _) = QueryBuilder::new(&USERS, &p).paginate().to_sql();
        let offset = (MAX_PAGE - 1) * MAX_LIMIT;
        assert!(sql.ends_with(&format!("LIMIT 100 OFFSET {}", offset)));

        let p = params(&[("page", "-4")]);
        let (sql, _) = QueryBuilder::new(&USERS, &p).paginate().to_sql();
        assert!(sql.ends_with("LIMIT 10 OFFSET 0"));
    }

    #[test]
    fn test_fields_restricts_projection() {
        let p = params(&[("fields", "fullName, email")]);
        let (sql, _) = QueryBuilder::new(&USERS, &p).fields().unwrap().to_sql();
        assert!(sql.starts_with(
            "SELECT jsonb_build_object('fullName', u.full_name, 'email', u.email) FROM users u"
        ));
    }

    #[test]
    fn test_negative_fields_and_exclude_remove_columns() {
        let p = params(&[("fields", "-email"), ("exclude", "city,address")]);
        let (sql, _) = QueryBuilder::new(&USERS, &p)
            .fields()
            .unwrap()
            .exclude()
            .unwrap()
            .to_sql();
        assert!(sql.contains("'fullName', u.full_name"));
        assert!(!sql.contains("u.email"));
        assert!(!sql.contains("u.city"));
        assert!(!sql.contains("u.address"));
    }

    #[test]
    fn test_projection_never_empty() {
        let p = params(&[("fields", "city"), ("exclude", "city")]);
        let (sql, _) = QueryBuilder::new(&USERS, &p)
            .fields()
            .unwrap()
            .exclude()
            .unwrap()
            .to_sql();
        assert!(sql.starts_with("SELECT jsonb_build_object('id', u.id) FROM users u"));
    }

    #[test]
    fn test_include_relations() {
        let p = params(&[]);
        let (sql, _) = QueryBuilder::new(&PLACES, &p)
            .select(&["id"])
            .unwrap()
            .include("user")
            .unwrap()
            .to_sql();
        assert_eq!(
            sql,
            "SELECT jsonb_build_object('id', p.id, 'user', (SELECT jsonb_build_object('id', p_user.id, 'fullName', p_user.full_name, 'email', p_user.email) FROM users p_user WHERE p_user.id = p.user_id)) FROM places p"
        );

        let (sql, _) = QueryBuilder::new(&SUBCATEGORIES, &p)
            .include("places")
            .unwrap()
            .to_sql();
        assert!(sql.contains(
            "'places', COALESCE((SELECT jsonb_agg(jsonb_build_object('id', s_places.id"
        ));
        assert!(sql.contains("FROM places s_places WHERE s_places.subcategory_id = s.id), '[]'::jsonb)"));

        assert!(QueryBuilder::new(&USERS, &p).include("places").is_err());
    }

    #[test]
    fn test_full_chain_bind_numbering() {
        let p = params(&[
            ("searchTerm", "lisbon"),
            ("role", "ADMIN"),
            ("sort", "-fullName"),
            ("page", "2"),
            ("limit", "20"),
        ]);
        let qb = QueryBuilder::new(&USERS, &p)
            .search(&["fullName", "city"])
            .unwrap()
            .filter()
            .unwrap()
            .where_eq("isDeleted", false)
            .unwrap()
            .sort()
            .unwrap()
            .fields()
            .unwrap()
            .exclude()
            .unwrap()
            .paginate();
        let (sql, count) = qb.to_sql();

        assert!(sql.contains(
            "WHERE (u.full_name ILIKE $1 OR u.city ILIKE $1) AND u.role::text = $2 AND u.is_deleted = $3"
        ));
        assert!(sql.ends_with("ORDER BY u.full_name DESC, u.id ASC LIMIT 20 OFFSET 20"));
        assert!(!count.contains("LIMIT"));
        assert_eq!(qb.binds().len(), 3);
    }

    #[test]
    fn test_bind_value_parsing() {
        let uuid_col = USERS.column("id").unwrap();
        assert!(BindValue::parse(uuid_col, "not-a-uuid").is_err());

        let ts_col = USERS.column("createdAt").unwrap();
        assert!(matches!(
            BindValue::parse(ts_col, "2025-01-01T00:00:00Z"),
            Ok(BindValue::Timestamp(_))
        ));

        let price = PLACES.column("price").unwrap();
        assert_eq!(BindValue::parse(price, "9.5").unwrap(), BindValue::Float(9.5));
    }
}
