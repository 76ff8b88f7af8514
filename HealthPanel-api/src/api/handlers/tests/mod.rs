mod records_test;
