mod carriers;
mod health;
mod misc;
mod orders;
mod shipments;
mod support;

pub(crate) use carriers::{
    create_carrier, delete_carrier, get_carrier, get_carrier_performance, list_carriers,
    patch_carrier_status, update_carrier, update_carrier_performance,
};
pub(crate) use health::health;
pub(crate) use misc::{root_banner, unknown_route};
pub(crate) use orders::{
    create_order, delete_order, get_order, list_orders, patch_order_status, update_order,
};
pub(crate) use shipments::{
    add_tracking_event, create_shipment, delete_shipment, get_shipment, get_tracking,
    list_shipments, patch_shipment_status, update_shipment,
};
