mod deepgram_engine_test;
