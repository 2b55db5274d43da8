mod descriptor_props;
