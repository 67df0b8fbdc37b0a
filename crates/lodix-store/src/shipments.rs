use crate::orders::{fetch_order, fetch_order_body, write_order};
use crate::{count_rows, decode, decode_patched, encode, merge_patch, Predicates, Store, StoreError};
use lodix_api::{PageParams, ShipmentFilter, TrackingRequest};
use lodix_model::{
    NewShipment, Order, OrderStatus, OrderSummary, Shipment, ShipmentStatus, TrackingEvent,
};
use rusqlite::params;
use serde::Serialize;
use serde_json::{Map, Value};

/// Shipment as served on reads: the document plus a summary of the order it
/// belongs to, joined at query time.
#[derive(Debug, Clone, Serialize)]
pub struct ShipmentRecord {
    #[serde(flatten)]
    pub shipment: Shipment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<OrderSummary>,
}

impl Store {
    /// Creates a shipment and moves its order to `processing` in one
    /// transaction. Orders already past `confirmed` are left untouched, so
    /// additional shipments against an order are cheap.
    pub async fn create_shipment(&self, new: NewShipment) -> Result<ShipmentRecord, StoreError> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        let mut order: Order = decode(&fetch_order_body(&tx, &new.order_id)?)?;
        if order.status == OrderStatus::Cancelled {
            return Err(StoreError::Conflict(
                "order is cancelled; no shipments can be created for it".to_string(),
            ));
        }
        let shipment = Shipment::create(new)?;
        tx.execute(
            "INSERT INTO shipments (id, body, created_at_ms) VALUES (?1, ?2, ?3)",
            params![
                shipment.id,
                encode(&shipment)?,
                shipment.created_at.timestamp_millis()
            ],
        )?;
        if matches!(order.status, OrderStatus::Draft | OrderStatus::Confirmed) {
            order.transition_to(OrderStatus::Processing)?;
            write_order(&tx, &order)?;
        }
        tx.commit()?;
        Ok(ShipmentRecord {
            order: Some(OrderSummary::from(&order)),
            shipment,
        })
    }

    pub async fn get_shipment(&self, id: &str) -> Result<ShipmentRecord, StoreError> {
        let conn = self.conn.lock().await;
        let shipment = fetch_shipment(&conn, id)?;
        let order = order_summary(&conn, &shipment.order_id)?;
        Ok(ShipmentRecord { shipment, order })
    }

    pub async fn list_shipments(
        &self,
        filter: &ShipmentFilter,
        page: PageParams,
    ) -> Result<(Vec<ShipmentRecord>, u64), StoreError> {
        let mut predicates = Predicates::default();
        if let Some(status) = filter.status {
            predicates.text("json_extract(s.body, '$.status') = ?", status.as_str());
        }
        if let Some(carrier_id) = &filter.carrier_id {
            predicates.text("json_extract(s.body, '$.carrier.id') = ?", carrier_id);
        }
        if let Some(country) = &filter.country {
            predicates.either(
                "json_extract(s.body, '$.origin.country')",
                "json_extract(s.body, '$.destination.country')",
                country,
            );
        }

        let conn = self.conn.lock().await;
        let total = count_rows(&conn, "shipments s", &predicates)?;
        let sql = format!(
            "SELECT s.body, o.body FROM shipments s \
             LEFT JOIN orders o ON o.id = json_extract(s.body, '$.orderId'){} \
             ORDER BY s.created_at_ms DESC, s.id DESC LIMIT ? OFFSET ?",
            predicates.where_sql()
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut params = predicates.params.clone();
        params.push(rusqlite::types::Value::Integer(page.limit as i64));
        params.push(rusqlite::types::Value::Integer(page.offset() as i64));
        let rows = stmt.query_map(rusqlite::params_from_iter(params.iter()), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?))
        })?;
        let mut records = Vec::new();
        for row in rows {
            let (shipment_body, order_body) = row?;
            let shipment: Shipment = decode(&shipment_body)?;
            let order = match order_body {
                Some(body) => {
                    let order: Order = decode(&body)?;
                    Some(OrderSummary::from(&order))
                }
                None => None,
            };
            records.push(ShipmentRecord { shipment, order });
        }
        Ok((records, total))
    }

    pub async fn update_shipment(
        &self,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<ShipmentRecord, StoreError> {
        let conn = self.conn.lock().await;
        let body = fetch_shipment_body(&conn, id)?;
        let shipment: Shipment = decode_patched(merge_patch(&body, patch)?)?;
        shipment.validate()?;
        write_shipment(&conn, &shipment)?;
        let order = order_summary(&conn, &shipment.order_id)?;
        Ok(ShipmentRecord { shipment, order })
    }

    pub async fn delete_shipment(&self, id: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        let deleted = conn.execute("DELETE FROM shipments WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(StoreError::NotFound("shipment"));
        }
        Ok(())
    }

    /// Appends one tracking event; the shipment's status field moves with it
    /// or the whole call fails.
    pub async fn append_tracking(
        &self,
        id: &str,
        request: TrackingRequest,
    ) -> Result<(Shipment, TrackingEvent), StoreError> {
        let conn = self.conn.lock().await;
        let mut shipment = fetch_shipment(&conn, id)?;
        let event = shipment.append_tracking_event(
            request.status,
            request.location,
            request.notes,
            request.updated_by,
        )?;
        write_shipment(&conn, &shipment)?;
        Ok((shipment, event))
    }

    /// Status change without an explicit scan: synthesized as a tracking
    /// event at the last known location, so the log stays the single source
    /// of truth for status history.
    pub async fn advance_shipment_status(
        &self,
        id: &str,
        status: ShipmentStatus,
    ) -> Result<Shipment, StoreError> {
        let conn = self.conn.lock().await;
        let mut shipment = fetch_shipment(&conn, id)?;
        let location = shipment.last_known_location();
        shipment.append_tracking_event(status, location, None, "status-endpoint".to_string())?;
        write_shipment(&conn, &shipment)?;
        Ok(shipment)
    }
}

fn fetch_shipment_body(conn: &rusqlite::Connection, id: &str) -> Result<String, StoreError> {
    conn.query_row(
        "SELECT body FROM shipments WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )
    .map_err(|err| match err {
        rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound("shipment"),
        other => StoreError::Sqlite(other),
    })
}

fn fetch_shipment(conn: &rusqlite::Connection, id: &str) -> Result<Shipment, StoreError> {
    decode(&fetch_shipment_body(conn, id)?)
}

fn write_shipment(conn: &rusqlite::Connection, shipment: &Shipment) -> Result<(), StoreError> {
    let updated = conn.execute(
        "UPDATE shipments SET body = ?2 WHERE id = ?1",
        params![shipment.id, encode(shipment)?],
    )?;
    if updated == 0 {
        return Err(StoreError::NotFound("shipment"));
    }
    Ok(())
}

fn order_summary(
    conn: &rusqlite::Connection,
    order_id: &str,
) -> Result<Option<OrderSummary>, StoreError> {
    match fetch_order(conn, order_id) {
        Ok(order) => Ok(Some(OrderSummary::from(&order))),
        Err(StoreError::NotFound(_)) => Ok(None),
        Err(err) => Err(err),
    }
}
