//! SQLite-based storage implementation

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use tutorhub_core::model::{Account, ApplicationStatus, Booking, Role, TutorApplication};
use tutorhub_core::status::CanonicalStatus;

use super::{
    AccountStore, ApplicationStore, BookingStore, NewAccount, NewApplication, NewBooking,
    RevocationStore, StoreResult, LIST_LIMIT,
};
use crate::error::AdminError;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// SQLite-based market store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a SQLite database at the given path
    pub fn open(path: &str) -> Result<Self, AdminError> {
        let conn = Connection::open(path).map_err(|e| AdminError::Internal(e.to_string()))?;

        // Run migrations
        Self::migrate(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run database migrations
    fn migrate(conn: &Connection) -> Result<(), AdminError> {
        let current_version = Self::get_schema_version(conn)?;

        if current_version < SCHEMA_VERSION {
            tracing::info!(
                current = current_version,
                target = SCHEMA_VERSION,
                "Running database migrations"
            );

            if current_version < 1 {
                Self::migrate_v1(conn)?;
            }

            conn.execute(
                "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
                params![SCHEMA_VERSION],
            )
            .map_err(|e| AdminError::Internal(e.to_string()))?;

            tracing::info!("Database migrations complete");
        }

        Ok(())
    }

    /// Get current schema version (0 if no schema exists)
    fn get_schema_version(conn: &Connection) -> Result<i32, AdminError> {
        let table_exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
                [],
                |row| row.get(0),
            )
            .map_err(|e| AdminError::Internal(e.to_string()))?;

        if !table_exists {
            return Ok(0);
        }

        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get::<_, Option<i32>>(0).map(|v| v.unwrap_or(0))
        })
        .map_err(|e| AdminError::Internal(e.to_string()))
    }

    /// Migration to version 1: initial schema
    fn migrate_v1(conn: &Connection) -> Result<(), AdminError> {
        conn.execute_batch(
            r#"
            -- Schema version tracking
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            -- User accounts
            CREATE TABLE IF NOT EXISTS users (
                uid TEXT PRIMARY KEY,
                email TEXT NOT NULL,
                display_name TEXT,
                role TEXT NOT NULL,
                hashed_password TEXT,
                is_blocked INTEGER NOT NULL DEFAULT 0,
                is_tutor_verified INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);
            CREATE INDEX IF NOT EXISTS idx_users_role ON users(role);

            -- Tutor applications (uid may dangle; accounts are never
            -- deleted through this service but imports can be partial)
            CREATE TABLE IF NOT EXISTS tutor_applications (
                id TEXT PRIMARY KEY,
                uid TEXT,
                full_name TEXT,
                email TEXT,
                subject TEXT,
                experience TEXT,
                status TEXT NOT NULL,
                submitted_at TEXT NOT NULL,
                reviewed_at TEXT,
                reviewed_by TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_applications_status ON tutor_applications(status);

            -- Bookings; status is free text as written by producers
            CREATE TABLE IF NOT EXISTS bookings (
                id TEXT PRIMARY KEY,
                student_id TEXT,
                tutor_id TEXT,
                start_at TEXT NOT NULL,
                hours REAL,
                mode TEXT,
                package_type TEXT,
                completed_sessions INTEGER,
                total_sessions INTEGER,
                price REAL,
                status TEXT,
                created_at TEXT NOT NULL,
                end_at TEXT
            );

            -- Token revocation cutoffs, one per uid
            CREATE TABLE IF NOT EXISTS revocations (
                uid TEXT PRIMARY KEY,
                revoked_at TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| AdminError::Internal(e.to_string()))?;

        Ok(())
    }
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn parse_timestamp_opt(s: Option<String>) -> Option<DateTime<Utc>> {
    s.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    })
}

fn account_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Account> {
    let role: String = row.get(3)?;
    let is_blocked: i32 = row.get(5)?;
    let is_tutor_verified: i32 = row.get(6)?;
    let created_at: String = row.get(7)?;
    Ok(Account {
        uid: row.get(0)?,
        email: row.get(1)?,
        display_name: row.get(2)?,
        role: Role::from_str(&role).unwrap_or(Role::Student),
        hashed_password: row.get(4)?,
        is_blocked: is_blocked != 0,
        is_tutor_verified: is_tutor_verified != 0,
        created_at: parse_timestamp(&created_at),
    })
}

fn application_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TutorApplication> {
    let status: String = row.get(6)?;
    let submitted_at: String = row.get(7)?;
    let reviewed_at: Option<String> = row.get(8)?;
    Ok(TutorApplication {
        id: row.get(0)?,
        uid: row.get(1)?,
        full_name: row.get(2)?,
        email: row.get(3)?,
        subject: row.get(4)?,
        experience: row.get(5)?,
        status: ApplicationStatus::from_str(&status).unwrap_or(ApplicationStatus::Pending),
        submitted_at: parse_timestamp(&submitted_at),
        reviewed_at: parse_timestamp_opt(reviewed_at),
        reviewed_by: row.get(9)?,
    })
}

fn booking_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Booking> {
    let start_at: String = row.get(3)?;
    let completed_sessions: Option<i64> = row.get(7)?;
    let total_sessions: Option<i64> = row.get(8)?;
    let created_at: String = row.get(11)?;
    let end_at: Option<String> = row.get(12)?;
    Ok(Booking {
        id: row.get(0)?,
        student_id: row.get(1)?,
        tutor_id: row.get(2)?,
        start_at: parse_timestamp(&start_at),
        hours: row.get(4)?,
        mode: row.get(5)?,
        package_type: row.get(6)?,
        completed_sessions: completed_sessions.map(|v| v as u32),
        total_sessions: total_sessions.map(|v| v as u32),
        price: row.get(9)?,
        status: row.get(10)?,
        created_at: parse_timestamp(&created_at),
        end_at: parse_timestamp_opt(end_at),
    })
}

const ACCOUNT_COLUMNS: &str =
    "uid, email, display_name, role, hashed_password, is_blocked, is_tutor_verified, created_at";

const APPLICATION_COLUMNS: &str =
    "id, uid, full_name, email, subject, experience, status, submitted_at, reviewed_at, reviewed_by";

const BOOKING_COLUMNS: &str =
    "id, student_id, tutor_id, start_at, hours, mode, package_type, completed_sessions, total_sessions, price, status, created_at, end_at";

impl AccountStore for SqliteStore {
    fn create_account(&self, new: NewAccount) -> StoreResult<Account> {
        let conn = self.conn.lock().unwrap();
        let account = Account {
            uid: Uuid::new_v4().to_string(),
            email: new.email,
            display_name: new.display_name,
            role: new.role,
            hashed_password: new.hashed_password,
            is_blocked: false,
            is_tutor_verified: false,
            created_at: Utc::now(),
        };

        conn.execute(
            "INSERT INTO users (uid, email, display_name, role, hashed_password, is_blocked, is_tutor_verified, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                account.uid,
                account.email,
                account.display_name,
                account.role.as_str(),
                account.hashed_password,
                account.is_blocked as i32,
                account.is_tutor_verified as i32,
                account.created_at.to_rfc3339(),
            ],
        )
        .map_err(|e| AdminError::Internal(e.to_string()))?;

        Ok(account)
    }

    fn get_account(&self, uid: &str) -> StoreResult<Option<Account>> {
        let conn = self.conn.lock().unwrap();

        conn.query_row(
            &format!("SELECT {ACCOUNT_COLUMNS} FROM users WHERE uid = ?1"),
            params![uid],
            account_from_row,
        )
        .optional()
        .map_err(|e| AdminError::Internal(e.to_string()))
    }

    fn find_admin_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let conn = self.conn.lock().unwrap();

        conn.query_row(
            &format!("SELECT {ACCOUNT_COLUMNS} FROM users WHERE email = ?1 AND role = ?2"),
            params![email, Role::Admin.as_str()],
            account_from_row,
        )
        .optional()
        .map_err(|e| AdminError::Internal(e.to_string()))
    }

    fn list_accounts(&self, role: Option<Role>) -> StoreResult<Vec<Account>> {
        let conn = self.conn.lock().unwrap();

        let accounts = match role {
            Some(role) => {
                let mut stmt = conn
                    .prepare(&format!(
                        "SELECT {ACCOUNT_COLUMNS} FROM users WHERE role = ?1 ORDER BY uid LIMIT ?2"
                    ))
                    .map_err(|e| AdminError::Internal(e.to_string()))?;
                let rows = stmt
                    .query_map(params![role.as_str(), LIST_LIMIT as i64], account_from_row)
                    .map_err(|e| AdminError::Internal(e.to_string()))?
                    .collect::<Result<Vec<_>, _>>();
                rows
            }
            None => {
                let mut stmt = conn
                    .prepare(&format!(
                        "SELECT {ACCOUNT_COLUMNS} FROM users ORDER BY uid LIMIT ?1"
                    ))
                    .map_err(|e| AdminError::Internal(e.to_string()))?;
                let rows = stmt
                    .query_map(params![LIST_LIMIT as i64], account_from_row)
                    .map_err(|e| AdminError::Internal(e.to_string()))?
                    .collect::<Result<Vec<_>, _>>();
                rows
            }
        }
        .map_err(|e| AdminError::Internal(e.to_string()))?;

        Ok(accounts)
    }

    fn set_blocked(&self, uid: &str, blocked: bool) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "UPDATE users SET is_blocked = ?1 WHERE uid = ?2",
            params![blocked as i32, uid],
        )
        .map_err(|e| AdminError::Internal(e.to_string()))?;

        Ok(())
    }

    fn accounts_snapshot(&self) -> StoreResult<Vec<Account>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn
            .prepare(&format!("SELECT {ACCOUNT_COLUMNS} FROM users"))
            .map_err(|e| AdminError::Internal(e.to_string()))?;
        let accounts = stmt
            .query_map([], account_from_row)
            .map_err(|e| AdminError::Internal(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AdminError::Internal(e.to_string()))?;

        Ok(accounts)
    }
}

impl ApplicationStore for SqliteStore {
    fn create_application(&self, new: NewApplication) -> StoreResult<TutorApplication> {
        let conn = self.conn.lock().unwrap();
        let application = TutorApplication {
            id: Uuid::new_v4().to_string(),
            uid: new.uid,
            full_name: new.full_name,
            email: new.email,
            subject: new.subject,
            experience: new.experience,
            status: ApplicationStatus::Pending,
            submitted_at: Utc::now(),
            reviewed_at: None,
            reviewed_by: None,
        };

        conn.execute(
            "INSERT INTO tutor_applications (id, uid, full_name, email, subject, experience, status, submitted_at, reviewed_at, reviewed_by)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                application.id,
                application.uid,
                application.full_name,
                application.email,
                application.subject,
                application.experience,
                application.status.as_str(),
                application.submitted_at.to_rfc3339(),
                None::<String>,
                None::<String>,
            ],
        )
        .map_err(|e| AdminError::Internal(e.to_string()))?;

        Ok(application)
    }

    fn get_application(&self, id: &str) -> StoreResult<Option<TutorApplication>> {
        let conn = self.conn.lock().unwrap();

        conn.query_row(
            &format!("SELECT {APPLICATION_COLUMNS} FROM tutor_applications WHERE id = ?1"),
            params![id],
            application_from_row,
        )
        .optional()
        .map_err(|e| AdminError::Internal(e.to_string()))
    }

    fn list_applications(
        &self,
        status: Option<ApplicationStatus>,
    ) -> StoreResult<Vec<TutorApplication>> {
        let conn = self.conn.lock().unwrap();

        let applications = match status {
            Some(status) => {
                let mut stmt = conn
                    .prepare(&format!(
                        "SELECT {APPLICATION_COLUMNS} FROM tutor_applications
                         WHERE status = ?1 ORDER BY submitted_at DESC LIMIT ?2"
                    ))
                    .map_err(|e| AdminError::Internal(e.to_string()))?;
                let rows = stmt
                    .query_map(
                        params![status.as_str(), LIST_LIMIT as i64],
                        application_from_row,
                    )
                    .map_err(|e| AdminError::Internal(e.to_string()))?
                    .collect::<Result<Vec<_>, _>>();
                rows
            }
            None => {
                let mut stmt = conn
                    .prepare(&format!(
                        "SELECT {APPLICATION_COLUMNS} FROM tutor_applications
                         ORDER BY submitted_at DESC LIMIT ?1"
                    ))
                    .map_err(|e| AdminError::Internal(e.to_string()))?;
                let rows = stmt
                    .query_map(params![LIST_LIMIT as i64], application_from_row)
                    .map_err(|e| AdminError::Internal(e.to_string()))?
                    .collect::<Result<Vec<_>, _>>();
                rows
            }
        }
        .map_err(|e| AdminError::Internal(e.to_string()))?;

        Ok(applications)
    }

    fn review_application(
        &self,
        id: &str,
        decision: ApplicationStatus,
        reviewer_uid: &str,
    ) -> StoreResult<TutorApplication> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn
            .transaction()
            .map_err(|e| AdminError::Internal(e.to_string()))?;

        let application = tx
            .query_row(
                &format!("SELECT {APPLICATION_COLUMNS} FROM tutor_applications WHERE id = ?1"),
                params![id],
                application_from_row,
            )
            .optional()
            .map_err(|e| AdminError::Internal(e.to_string()))?
            .ok_or(AdminError::ApplicationNotFound)?;

        if decision == ApplicationStatus::Approved {
            if let Some(uid) = &application.uid {
                let rows_affected = tx
                    .execute(
                        "UPDATE users SET role = ?1, is_tutor_verified = 1 WHERE uid = ?2",
                        params![Role::Tutor.as_str(), uid],
                    )
                    .map_err(|e| AdminError::Internal(e.to_string()))?;

                // Dropping the transaction here rolls the update back
                if rows_affected == 0 {
                    return Err(AdminError::AccountNotFound);
                }
            }
        }

        let reviewed_at = Utc::now();
        tx.execute(
            "UPDATE tutor_applications SET status = ?1, reviewed_at = ?2, reviewed_by = ?3 WHERE id = ?4",
            params![
                decision.as_str(),
                reviewed_at.to_rfc3339(),
                reviewer_uid,
                id
            ],
        )
        .map_err(|e| AdminError::Internal(e.to_string()))?;

        tx.commit()
            .map_err(|e| AdminError::Internal(e.to_string()))?;

        Ok(TutorApplication {
            status: decision,
            reviewed_at: Some(reviewed_at),
            reviewed_by: Some(reviewer_uid.to_string()),
            ..application
        })
    }
}

impl BookingStore for SqliteStore {
    fn create_booking(&self, new: NewBooking) -> StoreResult<Booking> {
        let conn = self.conn.lock().unwrap();
        let booking = Booking {
            id: Uuid::new_v4().to_string(),
            student_id: new.student_id,
            tutor_id: new.tutor_id,
            start_at: new.start_at,
            hours: new.hours,
            mode: new.mode,
            package_type: new.package_type,
            completed_sessions: new.completed_sessions,
            total_sessions: new.total_sessions,
            price: new.price,
            status: new.status,
            created_at: Utc::now(),
            end_at: new.end_at,
        };

        conn.execute(
            "INSERT INTO bookings (id, student_id, tutor_id, start_at, hours, mode, package_type, completed_sessions, total_sessions, price, status, created_at, end_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                booking.id,
                booking.student_id,
                booking.tutor_id,
                booking.start_at.to_rfc3339(),
                booking.hours,
                booking.mode,
                booking.package_type,
                booking.completed_sessions.map(|v| v as i64),
                booking.total_sessions.map(|v| v as i64),
                booking.price,
                booking.status,
                booking.created_at.to_rfc3339(),
                booking.end_at.map(|dt| dt.to_rfc3339()),
            ],
        )
        .map_err(|e| AdminError::Internal(e.to_string()))?;

        Ok(booking)
    }

    fn list_bookings(&self, status: Option<CanonicalStatus>) -> StoreResult<Vec<Booking>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY created_at DESC"
            ))
            .map_err(|e| AdminError::Internal(e.to_string()))?;
        let mut bookings = stmt
            .query_map([], booking_from_row)
            .map_err(|e| AdminError::Internal(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AdminError::Internal(e.to_string()))?;

        // Canonical status is derived from free text, so the filter
        // runs here and the cap applies after it
        if let Some(status) = status {
            bookings.retain(|b| b.canonical_status() == status);
        }
        bookings.truncate(LIST_LIMIT);

        Ok(bookings)
    }

    fn bookings_snapshot(&self) -> StoreResult<Vec<Booking>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn
            .prepare(&format!("SELECT {BOOKING_COLUMNS} FROM bookings"))
            .map_err(|e| AdminError::Internal(e.to_string()))?;
        let bookings = stmt
            .query_map([], booking_from_row)
            .map_err(|e| AdminError::Internal(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AdminError::Internal(e.to_string()))?;

        Ok(bookings)
    }
}

impl RevocationStore for SqliteStore {
    fn revoke_tokens(&self, uid: &str, at: DateTime<Utc>) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();

        let existing: Option<String> = conn
            .query_row(
                "SELECT revoked_at FROM revocations WHERE uid = ?1",
                params![uid],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| AdminError::Internal(e.to_string()))?;

        let cutoff = match existing.map(|s| parse_timestamp(&s)) {
            Some(prev) if prev > at => prev,
            _ => at,
        };

        conn.execute(
            "INSERT OR REPLACE INTO revocations (uid, revoked_at) VALUES (?1, ?2)",
            params![uid, cutoff.to_rfc3339()],
        )
        .map_err(|e| AdminError::Internal(e.to_string()))?;

        Ok(())
    }

    fn revoked_at(&self, uid: &str) -> StoreResult<Option<DateTime<Utc>>> {
        let conn = self.conn.lock().unwrap();

        let revoked_at: Option<String> = conn
            .query_row(
                "SELECT revoked_at FROM revocations WHERE uid = ?1",
                params![uid],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| AdminError::Internal(e.to_string()))?;

        Ok(revoked_at.map(|s| parse_timestamp(&s)))
    }
}
