use crate::domain::order::Order;

/// Orders whose customer name or order number contains `query`
/// (case-insensitive), newest first. Equal timestamps keep their input order.
pub fn view<'a>(orders: &'a [Order], query: &str) -> Vec<&'a Order> {
    let needle = query.to_lowercase();
    let mut matches: Vec<&Order> = orders
        .iter()
        .filter(|o| {
            o.customer_name.to_lowercase().contains(&needle)
                || o.order_number.to_lowercase().contains(&needle)
        })
        .collect();
    matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    matches
}
