mod site_authorizer_tests;
