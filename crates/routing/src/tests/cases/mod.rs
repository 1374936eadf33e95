mod degraded_pricing;
mod gas_estimates;
mod l1_data_fee;
mod session;
