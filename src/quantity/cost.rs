quantity!(Cost, "€");
