//! Enums shared by the JDL input model and the JSON entity output model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Relationship cardinality as declared in a `relationship` block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipType {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl RelationshipType {
    /// Kebab-case form written to the JSON output (`one-to-many`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::OneToOne => "one-to-one",
            RelationshipType::OneToMany => "one-to-many",
            RelationshipType::ManyToOne => "many-to-one",
            RelationshipType::ManyToMany => "many-to-many",
        }
    }

    /// The same relationship seen from the other entity.
    ///
    /// A one-to-many from A to B is a many-to-one from B's perspective.
    pub fn inverse(&self) -> Self {
        match self {
            RelationshipType::OneToMany => RelationshipType::ManyToOne,
            RelationshipType::ManyToOne => RelationshipType::OneToMany,
            other => *other,
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipType {
    type Err = String;

    /// Accepts both the JDL keyword (`OneToMany`) and the kebab-case form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OneToOne" | "one-to-one" => Ok(RelationshipType::OneToOne),
            "OneToMany" | "one-to-many" => Ok(RelationshipType::OneToMany),
            "ManyToOne" | "many-to-one" => Ok(RelationshipType::ManyToOne),
            "ManyToMany" | "many-to-many" => Ok(RelationshipType::ManyToMany),
            _ => Err(format!("Unknown relationship type: {}", s)),
        }
    }
}

/// Field validation kinds supported by JDL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationKind {
    Required,
    Unique,
    MinLength,
    MaxLength,
    Pattern,
    Min,
    Max,
    MinBytes,
    MaxBytes,
}

impl ValidationKind {
    pub fn name(&self) -> &'static str {
        match self {
            ValidationKind::Required => "required",
            ValidationKind::Unique => "unique",
            ValidationKind::MinLength => "minlength",
            ValidationKind::MaxLength => "maxlength",
            ValidationKind::Pattern => "pattern",
            ValidationKind::Min => "min",
            ValidationKind::Max => "max",
            ValidationKind::MinBytes => "minbytes",
            ValidationKind::MaxBytes => "maxbytes",
        }
    }

    /// Whether the validation carries a parameter (`maxlength(42)`)
    pub fn takes_value(&self) -> bool {
        !matches!(self, ValidationKind::Required | ValidationKind::Unique)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "required" => ValidationKind::Required,
            "unique" => ValidationKind::Unique,
            "minlength" => ValidationKind::MinLength,
            "maxlength" => ValidationKind::MaxLength,
            "pattern" => ValidationKind::Pattern,
            "min" => ValidationKind::Min,
            "max" => ValidationKind::Max,
            "minbytes" => ValidationKind::MinBytes,
            "maxbytes" => ValidationKind::MaxBytes,
            _ => return None,
        })
    }
}

/// Blob discriminator written as `fieldTypeBlobContent`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlobContent {
    Image,
    Any,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DtoOption {
    #[default]
    #[serde(rename = "no")]
    No,
    #[serde(rename = "mapstruct")]
    Mapstruct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ServiceOption {
    #[default]
    #[serde(rename = "no")]
    No,
    #[serde(rename = "serviceClass")]
    ServiceClass,
    #[serde(rename = "serviceImpl")]
    ServiceImpl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaginationOption {
    #[default]
    #[serde(rename = "no")]
    No,
    #[serde(rename = "pagination")]
    Pagination,
    #[serde(rename = "infinite-scroll")]
    InfiniteScroll,
}

impl FromStr for DtoOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no" => Ok(DtoOption::No),
            "mapstruct" => Ok(DtoOption::Mapstruct),
            _ => Err(format!("Unknown dto value: {}", s)),
        }
    }
}

impl FromStr for ServiceOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no" => Ok(ServiceOption::No),
            "serviceClass" => Ok(ServiceOption::ServiceClass),
            "serviceImpl" => Ok(ServiceOption::ServiceImpl),
            _ => Err(format!("Unknown service value: {}", s)),
        }
    }
}

impl FromStr for PaginationOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no" => Ok(PaginationOption::No),
            "pagination" | "pager" => Ok(PaginationOption::Pagination),
            "infinite-scroll" => Ok(PaginationOption::InfiniteScroll),
            _ => Err(format!("Unknown pagination value: {}", s)),
        }
    }
}

/// Database type of the application the entities belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    Sql,
    Mongodb,
    Cassandra,
    Couchbase,
    Neo4j,
    No,
}

impl DatabaseType {
    pub fn is_sql(&self) -> bool {
        matches!(self, DatabaseType::Sql)
    }
}

impl FromStr for DatabaseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sql" => Ok(DatabaseType::Sql),
            "mongodb" => Ok(DatabaseType::Mongodb),
            "cassandra" => Ok(DatabaseType::Cassandra),
            "couchbase" => Ok(DatabaseType::Couchbase),
            "neo4j" => Ok(DatabaseType::Neo4j),
            "no" => Ok(DatabaseType::No),
            _ => Err(format!("Unknown database type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationType {
    #[default]
    Monolith,
    Microservice,
    Gateway,
}

impl FromStr for ApplicationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monolith" => Ok(ApplicationType::Monolith),
            "microservice" => Ok(ApplicationType::Microservice),
            "gateway" => Ok(ApplicationType::Gateway),
            _ => Err(format!("Unknown application type: {}", s)),
        }
    }
}
