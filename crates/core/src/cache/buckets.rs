//! Bucket and entry operations.
//!
//! A bucket is a named set of request → response entries. Buckets are
//! enumerated in creation order, and lookups across buckets return the
//! first match in that order.

use super::connection::CacheDb;
use crate::{Error, Request, Response};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::{self, OptionalExtension};

/// Row shape shared by the lookup queries.
const ENTRY_COLUMNS: &str = "e.final_url, e.status, e.status_text, e.headers_json, e.body";

fn row_to_response(row: &rusqlite::Row<'_>) -> rusqlite::Result<(Response, String)> {
    let headers_json: String = row.get(3)?;
    Ok((
        Response {
            url: row.get(0)?,
            status: row.get(1)?,
            status_text: row.get(2)?,
            headers: Vec::new(),
            body: row.get(4)?,
        },
        headers_json,
    ))
}

fn decode(found: Option<(Response, String)>) -> Result<Option<Response>, Error> {
    match found {
        Some((mut response, headers_json)) => {
            response.headers = serde_json::from_str(&headers_json)?;
            Ok(Some(response))
        }
        None => Ok(None),
    }
}

impl CacheDb {
    /// Open a bucket, creating it if absent.
    ///
    /// Returns true if the bucket was created by this call.
    pub async fn open_bucket(&self, name: &str) -> Result<bool, Error> {
        let name = name.to_string();
        let created_at = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let inserted = conn.execute(
                    "INSERT INTO buckets (name, created_at) VALUES (?1, ?2)
                     ON CONFLICT(name) DO NOTHING",
                    params![name, created_at],
                )?;
                Ok(inserted == 1)
            })
            .await
            .map_err(Error::from)
    }

    /// All bucket names, oldest first.
    pub async fn bucket_names(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT name FROM buckets ORDER BY rowid ASC")?;
                let names = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<Result<Vec<String>, _>>()?;
                Ok(names)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete a bucket and every entry in it.
    ///
    /// Returns false if no such bucket existed.
    pub async fn delete_bucket(&self, name: &str) -> Result<bool, Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let deleted = conn.execute("DELETE FROM buckets WHERE name = ?1", params![name])?;
                Ok(deleted == 1)
            })
            .await
            .map_err(Error::from)
    }

    /// Store every entry in a single transaction.
    ///
    /// Either all entries are written or none are. An existing entry with the
    /// same request identity is replaced.
    pub async fn put_entries(&self, bucket: &str, entries: Vec<(Request, Response)>) -> Result<(), Error> {
        let bucket = bucket.to_string();
        let stored_at = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;

                let exists: bool = tx.query_row(
                    "SELECT EXISTS(SELECT 1 FROM buckets WHERE name = ?1)",
                    params![bucket],
                    |row| row.get(0),
                )?;
                if !exists {
                    return Err(Error::BucketNotFound(bucket));
                }

                {
                    let mut stmt = tx.prepare(
                        "INSERT INTO entries (
                            bucket, key_hash, method, url, status, status_text,
                            headers_json, body, final_url, stored_at
                        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                        ON CONFLICT(bucket, key_hash) DO UPDATE SET
                            status = excluded.status,
                            status_text = excluded.status_text,
                            headers_json = excluded.headers_json,
                            body = excluded.body,
                            final_url = excluded.final_url,
                            stored_at = excluded.stored_at",
                    )?;

                    for (request, response) in &entries {
                        let headers_json = serde_json::to_string(&response.headers)?;
                        stmt.execute(params![
                            &bucket,
                            request.cache_key(),
                            &request.method,
                            request.url.as_str(),
                            response.status,
                            &response.status_text,
                            headers_json,
                            &response.body,
                            &response.url,
                            &stored_at,
                        ])?;
                    }
                }

                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Look a request up across every bucket, oldest bucket first.
    pub async fn match_any(&self, request: &Request) -> Result<Option<Response>, Error> {
        let key = request.cache_key();
        let found = self
            .conn
            .call(move |conn| -> Result<Option<(Response, String)>, Error> {
                let sql = format!(
                    "SELECT {ENTRY_COLUMNS} FROM entries e
                     JOIN buckets b ON b.name = e.bucket
                     WHERE e.key_hash = ?1
                     ORDER BY b.rowid ASC LIMIT 1"
                );
                let found = conn.query_row(&sql, params![key], row_to_response).optional()?;
                Ok(found)
            })
            .await
            .map_err(Error::from)?;

        decode(found)
    }

    /// Look a request up in one bucket.
    pub async fn match_in_bucket(&self, bucket: &str, request: &Request) -> Result<Option<Response>, Error> {
        let bucket = bucket.to_string();
        let key = request.cache_key();
        let found = self
            .conn
            .call(move |conn| -> Result<Option<(Response, String)>, Error> {
                let sql = format!("SELECT {ENTRY_COLUMNS} FROM entries e WHERE e.bucket = ?1 AND e.key_hash = ?2");
                let found = conn.query_row(&sql, params![bucket, key], row_to_response).optional()?;
                Ok(found)
            })
            .await
            .map_err(Error::from)?;

        decode(found)
    }

    /// Requests stored in a bucket, in insertion order.
    pub async fn bucket_requests(&self, bucket: &str) -> Result<Vec<Request>, Error> {
        let bucket = bucket.to_string();
        let rows = self
            .conn
            .call(move |conn| -> Result<Vec<(String, String)>, Error> {
                let mut stmt = conn.prepare("SELECT method, url FROM entries WHERE bucket = ?1 ORDER BY rowid ASC")?;
                let rows = stmt
                    .query_map(params![bucket], |row| Ok((row.get(0)?, row.get(1)?)))?
                    .collect::<Result<Vec<(String, String)>, _>>()?;
                Ok(rows)
            })
            .await
            .map_err(Error::from)?;

        rows.iter().map(|(method, url)| Request::new(method, url)).collect()
    }
}
