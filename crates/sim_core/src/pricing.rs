//! Fare calculation, driver earnings, and platform revenue.
//!
//! A geographic base-fare-plus-per-km formula is generalized here: with no
//! base fare component, fare is `price` (the equilibration coefficient)
//! times the trip's ride distance in blocks.

/// Fare for a trip of `ride_distance` blocks at the given per-block `price`.
pub fn calculate_trip_fare(ride_distance: u32, price: f64) -> f64 {
    price * ride_distance as f64
}

/// Commission amount retained by the platform.
pub fn calculate_commission(fare: f64, platform_commission: f64) -> f64 {
    fare * platform_commission
}

/// Driver earnings: fare minus commission.
pub fn calculate_driver_earnings(fare: f64, platform_commission: f64) -> f64 {
    fare * (1.0 - platform_commission)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fare_scales_with_distance_and_price() {
        assert_eq!(calculate_trip_fare(4, 1.5), 6.0);
    }

    #[test]
    fn commission_and_earnings_sum_to_fare() {
        let fare = calculate_trip_fare(10, 2.0);
        let commission = calculate_commission(fare, 0.2);
        let earnings = calculate_driver_earnings(fare, 0.2);
        assert!((commission + earnings - fare).abs() < 1e-9);
    }

    #[test]
    fn zero_commission_gives_driver_full_fare() {
        let fare = calculate_trip_fare(5, 1.0);
        assert_eq!(calculate_driver_earnings(fare, 0.0), fare);
    }
}
