mod text_export_service_test;
