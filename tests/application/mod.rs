mod ingestion_service_test;
mod token_counter_test;
