// src/model/plan.rs

/// Solved inventory and ordering decisions, indexed `[site][period]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    inventory: Vec<Vec<f64>>,
    orders: Vec<Vec<bool>>,
    objective: f64,
}

impl Plan {
    pub fn new(inventory: Vec<Vec<f64>>, orders: Vec<Vec<bool>>, objective: f64) -> Self {
        Self {
            inventory,
            orders,
            objective,
        }
    }

    pub fn site_count(&self) -> usize {
        self.inventory.len()
    }

    pub fn period_count(&self) -> usize {
        self.inventory.first().map_or(0, Vec::len)
    }

    /// Stock held at site `i` at the end of period `t`.
    pub fn inventory(&self, i: usize, t: usize) -> f64 {
        self.inventory[i][t]
    }

    /// Whether an order was placed at site `i` in period `t`.
    pub fn order(&self, i: usize, t: usize) -> bool {
        self.orders[i][t]
    }

    /// On-hand stock summed across all sites.
    pub fn total_inventory(&self, t: usize) -> f64 {
        self.inventory.iter().map(|site| site[t]).sum()
    }

    pub fn orders_in_period(&self, t: usize) -> usize {
        self.orders.iter().filter(|site| site[t]).count()
    }

    pub fn order_count(&self) -> usize {
        self.orders.iter().flatten().filter(|&&o| o).count()
    }

    pub fn objective(&self) -> f64 {
        self.objective
    }
}
