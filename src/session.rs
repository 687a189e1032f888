use sled::transaction::{ConflictableTransactionError, TransactionError, TransactionResult};
use sled::{Db, IVec};

use crate::error::SessionError;
use crate::models::Credentials;

const SESSION_TREE: &str = "session";
const TOKEN_KEY: &str = "jwt";
const EMP_ID_KEY: &str = "empId";

/// Durable holder of the session credentials
///
/// Both fields live in one Sled tree and every operation runs as a single
/// transaction over the pair, so a reader never sees a token without an
/// employee id or the other way round.
#[derive(Clone)] // Sled handles are reference-counted; clones share the same tree
pub struct SessionStore {
    #[allow(dead_code)] // kept so the db outlives the tree handle
    db: Db,
    tree: sled::Tree,
}

impl SessionStore {
    /// Open or create the session database at `path`.
    pub fn open(path: &str) -> Result<Self, SessionError> {
        Self::from_db(sled::open(path)?)
    }

    /// In-memory store, dropped with the last handle.
    pub fn temporary() -> Result<Self, SessionError> {
        Self::from_db(sled::Config::new().temporary(true).open()?)
    }

    fn from_db(db: Db) -> Result<Self, SessionError> {
        let tree = db.open_tree(SESSION_TREE)?;
        Ok(Self { db, tree })
    }

    /// Persist token and employee id together.
    ///
    /// A failed save leaves no partial session behind; callers must treat it
    /// as fatal to the login that produced the credentials.
    pub fn save(&self, credentials: &Credentials) -> Result<(), SessionError> {
        let result: TransactionResult<()> = self.tree.transaction(|tx| {
            tx.insert(TOKEN_KEY, credentials.token.as_bytes())?;
            tx.insert(EMP_ID_KEY, credentials.employee_id.as_bytes())?;
            Ok::<_, ConflictableTransactionError<()>>(())
        });
        unwrap_transaction(result)?;
        self.tree.flush()?;
        Ok(())
    }

    /// Stored credentials, or `None` when either field is missing or empty.
    pub fn load(&self) -> Result<Option<Credentials>, SessionError> {
        let result: TransactionResult<(Option<IVec>, Option<IVec>)> = self.tree.transaction(|tx| {
            Ok::<_, ConflictableTransactionError<()>>((tx.get(TOKEN_KEY)?, tx.get(EMP_ID_KEY)?))
        });
        let (token, employee_id) = match unwrap_transaction(result)? {
            (Some(token), Some(employee_id)) => (
                decode(&token, TOKEN_KEY)?,
                decode(&employee_id, EMP_ID_KEY)?,
            ),
            _ => return Ok(None),
        };
        if token.is_empty() || employee_id.is_empty() {
            return Ok(None);
        }
        Ok(Some(Credentials { token, employee_id }))
    }

    /// Remove both fields. Clearing an empty store is a no-op.
    pub fn clear(&self) -> Result<(), SessionError> {
        let result: TransactionResult<()> = self.tree.transaction(|tx| {
            tx.remove(TOKEN_KEY)?;
            tx.remove(EMP_ID_KEY)?;
            Ok::<_, ConflictableTransactionError<()>>(())
        });
        unwrap_transaction(result)?;
        self.tree.flush()?;
        Ok(())
    }
}

fn unwrap_transaction<T>(result: TransactionResult<T>) -> Result<T, SessionError> {
    match result {
        Ok(value) => Ok(value),
        Err(TransactionError::Storage(e)) => Err(SessionError::Storage(e)),
        // Closures above never abort explicitly.
        Err(TransactionError::Abort(())) => Err(SessionError::Storage(sled::Error::Unsupported(
            "session transaction aborted".to_string(),
        ))),
    }
}

fn decode(bytes: &IVec, key: &'static str) -> Result<String, SessionError> {
    String::from_utf8(bytes.to_vec()).map_err(|_| SessionError::Corrupt(key))
}
