//! Database dialect metadata
//!
//! Connection-string schemes and driver identifiers for the supported
//! database kinds. Pure static data, fixed at build time; lookups have no
//! side effects.

use crate::{CisternError, Result};

/// The database kinds cistern knows a connection-string scheme for.
///
/// Only a subset has an in-tree driver; the rest resolve to a [`Dialect`]
/// whose driver identifier is absent from the registry, which surfaces as
/// a driver-unavailable failure at connect time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseKind {
    MySql,
    Sqlite,
    H2,
    Postgres,
    MariaDb,
    Hsqldb,
    Derby,
    Firebird,
    Db2,
}

/// Connection-string scheme and driver identifier for one database kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    kind: DatabaseKind,
    display_name: &'static str,
    scheme: &'static str,
    driver: &'static str,
}

const DIALECTS: &[Dialect] = &[
    Dialect {
        kind: DatabaseKind::MySql,
        display_name: "MySQL",
        scheme: "mysql:",
        driver: "mysql",
    },
    Dialect {
        kind: DatabaseKind::Sqlite,
        display_name: "SQLite",
        scheme: "sqlite:",
        driver: "sqlite",
    },
    Dialect {
        kind: DatabaseKind::H2,
        display_name: "H2",
        scheme: "h2:",
        driver: "h2",
    },
    Dialect {
        kind: DatabaseKind::Postgres,
        display_name: "PostgreSQL",
        scheme: "postgres:",
        driver: "postgres",
    },
    Dialect {
        kind: DatabaseKind::MariaDb,
        display_name: "MariaDB",
        scheme: "mariadb:",
        driver: "mariadb",
    },
    Dialect {
        kind: DatabaseKind::Hsqldb,
        display_name: "HSQLDB",
        scheme: "hsqldb:",
        driver: "hsqldb",
    },
    Dialect {
        kind: DatabaseKind::Derby,
        display_name: "Derby",
        scheme: "derby:",
        driver: "derby",
    },
    Dialect {
        kind: DatabaseKind::Firebird,
        display_name: "Firebird",
        scheme: "firebird:",
        driver: "firebird",
    },
    Dialect {
        kind: DatabaseKind::Db2,
        display_name: "DB2",
        scheme: "db2:",
        driver: "db2",
    },
];

impl DatabaseKind {
    /// The dialect record for this kind.
    pub fn dialect(self) -> Dialect {
        // DIALECTS covers every variant; the lookup cannot miss.
        *DIALECTS
            .iter()
            .find(|d| d.kind == self)
            .unwrap_or(&DIALECTS[0])
    }
}

impl Dialect {
    /// Look up a dialect by driver identifier, e.g. "mysql" or "sqlite".
    ///
    /// The comparison is case-insensitive. Unknown identifiers are a
    /// [`CisternError::NotFound`].
    pub fn resolve(name: &str) -> Result<Dialect> {
        let lowered = name.to_lowercase();
        DIALECTS
            .iter()
            .find(|d| d.driver == lowered)
            .copied()
            .ok_or_else(|| CisternError::NotFound(format!("Unknown database kind: {name}")))
    }

    pub fn kind(&self) -> DatabaseKind {
        self.kind
    }

    /// Human-readable name, e.g. "MySQL".
    pub fn display_name(&self) -> &'static str {
        self.display_name
    }

    /// URI scheme prefix, e.g. "mysql:". Connection strings are
    /// `<scheme>//<host>:<port>/<database>` for server databases and
    /// `<scheme><path>` for file-backed ones.
    pub fn scheme(&self) -> &'static str {
        self.scheme
    }

    /// Identifier used to look the driver up in the registry.
    pub fn driver(&self) -> &'static str {
        self.driver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_known_kinds() {
        let mysql = Dialect::resolve("mysql").expect("mysql resolves");
        assert_eq!(mysql.kind(), DatabaseKind::MySql);
        assert_eq!(mysql.scheme(), "mysql:");
        assert_eq!(mysql.display_name(), "MySQL");

        let sqlite = Dialect::resolve("sqlite").expect("sqlite resolves");
        assert_eq!(sqlite.scheme(), "sqlite:");
        assert_eq!(sqlite.driver(), "sqlite");
    }

    #[test]
    fn resolve_is_case_insensitive() {
        let upper = Dialect::resolve("MARIADB").expect("resolves");
        assert_eq!(upper.kind(), DatabaseKind::MariaDb);
    }

    #[test]
    fn resolve_unknown_kind_is_not_found() {
        let err = Dialect::resolve("oracle").expect_err("unknown kind");
        assert!(matches!(err, CisternError::NotFound(_)));
        assert_eq!(err.category(), "not-found");
    }

    #[test]
    fn every_kind_has_a_dialect() {
        for kind in [
            DatabaseKind::MySql,
            DatabaseKind::Sqlite,
            DatabaseKind::H2,
            DatabaseKind::Postgres,
            DatabaseKind::MariaDb,
            DatabaseKind::Hsqldb,
            DatabaseKind::Derby,
            DatabaseKind::Firebird,
            DatabaseKind::Db2,
        ] {
            let dialect = kind.dialect();
            assert_eq!(dialect.kind(), kind);
            assert!(dialect.scheme().ends_with(':'));
        }
    }
}
