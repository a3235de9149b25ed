use pp_core::{round2, CustomerMetricsRecord, Field};

/// Fields whose change requires `average_order_value` to be recomputed.
pub fn drives_average_order_value(field: Field) -> bool {
    matches!(field, Field::TotalOrders | Field::TotalSpent)
}

/// Set `average_order_value = round2(total_spent / total_orders)`.
///
/// With zero orders the previous value is kept as is, so a form that drops
/// back to zero orders still shows the last computed average.
pub fn recompute_average_order_value(record: &mut CustomerMetricsRecord) {
    if record.total_orders > 0 {
        record.average_order_value = round2(record.total_spent / record.total_orders as f64);
    }
}

/// Run the recomputation if `changed` is one of its inputs.
pub fn apply(record: &mut CustomerMetricsRecord, changed: Field) {
    if drives_average_order_value(changed) {
        recompute_average_order_value(record);
    }
}
