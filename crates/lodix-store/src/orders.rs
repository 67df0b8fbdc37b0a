use crate::{count_rows, decode, decode_patched, encode, merge_patch, Predicates, Store, StoreError};
use lodix_api::{OrderFilter, PageParams};
use lodix_model::{Order, OrderStatus};
use rusqlite::params;
use serde_json::{Map, Value};

impl Store {
    pub async fn insert_order(&self, order: &Order) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO orders (id, body, created_at_ms) VALUES (?1, ?2, ?3)",
            params![
                order.id,
                encode(order)?,
                order.created_at.timestamp_millis()
            ],
        )?;
        Ok(())
    }

    pub async fn get_order(&self, id: &str) -> Result<Order, StoreError> {
        let conn = self.conn.lock().await;
        fetch_order(&conn, id)
    }

    pub async fn list_orders(
        &self,
        filter: &OrderFilter,
        page: PageParams,
    ) -> Result<(Vec<Order>, u64), StoreError> {
        let mut predicates = Predicates::default();
        if let Some(status) = filter.status {
            predicates.text("json_extract(body, '$.status') = ?", status.as_str());
        }
        if let Some(priority) = filter.priority {
            predicates.text("json_extract(body, '$.priority') = ?", priority.as_str());
        }
        if let Some(country) = &filter.country {
            predicates.either(
                "json_extract(body, '$.shipper.country')",
                "json_extract(body, '$.consignee.country')",
                country,
            );
        }

        let conn = self.conn.lock().await;
        let total = count_rows(&conn, "orders", &predicates)?;
        let sql = format!(
            "SELECT body FROM orders{} ORDER BY created_at_ms DESC, id DESC LIMIT ? OFFSET ?",
            predicates.where_sql()
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut params = predicates.params.clone();
        params.push(rusqlite::types::Value::Integer(page.limit as i64));
        params.push(rusqlite::types::Value::Integer(page.offset() as i64));
        let rows = stmt.query_map(rusqlite::params_from_iter(params.iter()), |row| {
            row.get::<_, String>(0)
        })?;
        let mut orders = Vec::new();
        for body in rows {
            orders.push(decode(&body?)?);
        }
        Ok((orders, total))
    }

    /// Shallow overwrite of unprotected fields, then full revalidation of the
    /// merged document.
    pub async fn update_order(
        &self,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<Order, StoreError> {
        let conn = self.conn.lock().await;
        let body = fetch_order_body(&conn, id)?;
        let order: Order = decode_patched(merge_patch(&body, patch)?)?;
        order.validate()?;
        write_order(&conn, &order)?;
        Ok(order)
    }

    /// Refuses deletion while shipments still reference the order.
    pub async fn delete_order(&self, id: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        let referencing: i64 = conn.query_row(
            "SELECT COUNT(*) FROM shipments WHERE json_extract(body, '$.orderId') = ?1",
            params![id],
            |row| row.get(0),
        )?;
        if referencing > 0 {
            return Err(StoreError::Conflict(format!(
                "order has {referencing} shipment(s); delete them first"
            )));
        }
        let deleted = conn.execute("DELETE FROM orders WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(StoreError::NotFound("order"));
        }
        Ok(())
    }

    pub async fn set_order_status(
        &self,
        id: &str,
        next: OrderStatus,
    ) -> Result<Order, StoreError> {
        let conn = self.conn.lock().await;
        let mut order = fetch_order(&conn, id)?;
        order.transition_to(next)?;
        write_order(&conn, &order)?;
        Ok(order)
    }
}

pub(crate) fn fetch_order_body(
    conn: &rusqlite::Connection,
    id: &str,
) -> Result<String, StoreError> {
    conn.query_row(
        "SELECT body FROM orders WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )
    .map_err(|err| match err {
        rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound("order"),
        other => StoreError::Sqlite(other),
    })
}

pub(crate) fn fetch_order(conn: &rusqlite::Connection, id: &str) -> Result<Order, StoreError> {
    decode(&fetch_order_body(conn, id)?)
}

pub(crate) fn write_order(conn: &rusqlite::Connection, order: &Order) -> Result<(), StoreError> {
    let updated = conn.execute(
        "UPDATE orders SET body = ?2 WHERE id = ?1",
        params![order.id, encode(order)?],
    )?;
    if updated == 0 {
        return Err(StoreError::NotFound("order"));
    }
    Ok(())
}
