mod blocking;
