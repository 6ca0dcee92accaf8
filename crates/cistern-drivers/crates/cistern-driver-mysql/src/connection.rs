//! MySQL connection implementation

use async_trait::async_trait;
use cistern_core::{CisternError, Connection, Result};
use mysql_async::{Conn, Opts, OptsBuilder};
use tokio::sync::Mutex;

/// MySQL connection wrapper
///
/// One wrapper owns exactly one server session. Closing hands the
/// session back to the server with a clean quit; `None` marks a closed
/// connection.
pub struct MySqlConnection {
    conn: Mutex<Option<Conn>>,
}

impl MySqlConnection {
    /// Connect to a MySQL server.
    pub async fn connect(
        host: &str,
        port: u16,
        database: Option<&str>,
        user: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self> {
        tracing::info!(host = %host, port = %port, database = ?database, "connecting to MySQL server");

        let mut opts_builder = OptsBuilder::from_opts(Opts::default())
            .ip_or_hostname(host)
            .tcp_port(port);

        if let Some(db) = database {
            opts_builder = opts_builder.db_name(Some(db));
        }
        if let Some(u) = user {
            opts_builder = opts_builder.user(Some(u));
        }
        if let Some(p) = password {
            opts_builder = opts_builder.pass(Some(p));
        }

        let opts: Opts = opts_builder.into();
        let conn = Conn::new(opts)
            .await
            .map_err(|e| CisternError::Connection(format!("Failed to connect to MySQL: {e}")))?;

        tracing::info!(host = %host, port = %port, "MySQL connection established");
        Ok(Self {
            conn: Mutex::new(Some(conn)),
        })
    }
}

#[async_trait]
impl Connection for MySqlConnection {
    fn driver_name(&self) -> &str {
        "mysql"
    }

    async fn close(&self) -> Result<()> {
        tracing::info!("closing MySQL connection");
        let conn = self.conn.lock().await.take();
        match conn {
            Some(conn) => conn.disconnect().await.map_err(|e| {
                CisternError::Teardown(format!("Failed to close MySQL connection: {e}"))
            }),
            None => Err(CisternError::Teardown(
                "MySQL connection already closed".into(),
            )),
        }
    }

    fn is_closed(&self) -> bool {
        // A connection mid-close still counts as open.
        self.conn.try_lock().map(|g| g.is_none()).unwrap_or(false)
    }
}
