use crate::{count_rows, decode, decode_patched, encode, merge_patch, Predicates, Store, StoreError};
use lodix_api::{CarrierFilter, PageParams, PerformanceUpdate};
use lodix_model::Carrier;
use rusqlite::params;
use serde_json::{Map, Value};

impl Store {
    pub async fn insert_carrier(&self, carrier: &Carrier) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO carriers (id, body, created_at_ms) VALUES (?1, ?2, ?3)",
            params![
                carrier.id,
                encode(carrier)?,
                carrier.created_at.timestamp_millis()
            ],
        )?;
        Ok(())
    }

    pub async fn get_carrier(&self, id: &str) -> Result<Carrier, StoreError> {
        let conn = self.conn.lock().await;
        fetch_carrier(&conn, id)
    }

    /// Best performers first: rating, then track record length.
    pub async fn list_carriers(
        &self,
        filter: &CarrierFilter,
        page: PageParams,
    ) -> Result<(Vec<Carrier>, u64), StoreError> {
        let mut predicates = Predicates::default();
        if let Some(country) = &filter.country {
            predicates.text("json_extract(body, '$.contactInfo.country') = ?", country);
        }
        if let Some(service) = &filter.service {
            // Whitelisted upstream against the closed flag-name set.
            predicates.flag(
                &format!("json_extract(body, '$.services.{service}') = ?"),
                true,
            );
        }
        if let Some(is_active) = filter.is_active {
            predicates.flag(
                "json_extract(body, '$.availability.isActive') = ?",
                is_active,
            );
        }

        let conn = self.conn.lock().await;
        let total = count_rows(&conn, "carriers", &predicates)?;
        let sql = format!(
            "SELECT body FROM carriers{} \
             ORDER BY CAST(json_extract(body, '$.performance.rating') AS REAL) DESC, \
                      CAST(json_extract(body, '$.performance.totalShipments') AS INTEGER) DESC, \
                      created_at_ms DESC \
             LIMIT ? OFFSET ?",
            predicates.where_sql()
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut params = predicates.params.clone();
        params.push(rusqlite::types::Value::Integer(page.limit as i64));
        params.push(rusqlite::types::Value::Integer(page.offset() as i64));
        let rows = stmt.query_map(rusqlite::params_from_iter(params.iter()), |row| {
            row.get::<_, String>(0)
        })?;
        let mut carriers = Vec::new();
        for body in rows {
            carriers.push(decode(&body?)?);
        }
        Ok((carriers, total))
    }

    pub async fn update_carrier(
        &self,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<Carrier, StoreError> {
        let conn = self.conn.lock().await;
        let body = fetch_carrier_body(&conn, id)?;
        let carrier: Carrier = decode_patched(merge_patch(&body, patch)?)?;
        carrier.validate()?;
        write_carrier(&conn, &carrier)?;
        Ok(carrier)
    }

    pub async fn delete_carrier(&self, id: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        let deleted = conn.execute("DELETE FROM carriers WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(StoreError::NotFound("carrier"));
        }
        Ok(())
    }

    pub async fn set_carrier_active(&self, id: &str, active: bool) -> Result<Carrier, StoreError> {
        let conn = self.conn.lock().await;
        let mut carrier = fetch_carrier(&conn, id)?;
        carrier.availability.is_active = active;
        carrier.updated_at = chrono::Utc::now();
        write_carrier(&conn, &carrier)?;
        Ok(carrier)
    }

    pub async fn update_carrier_performance(
        &self,
        id: &str,
        update: PerformanceUpdate,
    ) -> Result<Carrier, StoreError> {
        let conn = self.conn.lock().await;
        let mut carrier = fetch_carrier(&conn, id)?;
        carrier.performance.apply_update(
            update.rating,
            update.on_time_delivery,
            update.damage_rate,
        )?;
        carrier.updated_at = chrono::Utc::now();
        write_carrier(&conn, &carrier)?;
        Ok(carrier)
    }
}

fn fetch_carrier_body(conn: &rusqlite::Connection, id: &str) -> Result<String, StoreError> {
    conn.query_row(
        "SELECT body FROM carriers WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )
    .map_err(|err| match err {
        rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound("carrier"),
        other => StoreError::Sqlite(other),
    })
}

fn fetch_carrier(conn: &rusqlite::Connection, id: &str) -> Result<Carrier, StoreError> {
    decode(&fetch_carrier_body(conn, id)?)
}

fn write_carrier(conn: &rusqlite::Connection, carrier: &Carrier) -> Result<(), StoreError> {
    let updated = conn.execute(
        "UPDATE carriers SET body = ?2 WHERE id = ?1",
        params![carrier.id, encode(carrier)?],
    )?;
    if updated == 0 {
        return Err(StoreError::NotFound("carrier"));
    }
    Ok(())
}
