mod traversal_tests;
